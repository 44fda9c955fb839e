//! Document model: layers of strokes and highlights plus root text anchors.

mod ids;
mod tool;

pub use ids::IdAllocator;
pub use tool::{Presets, Tool};

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::SceneCodec;
use crate::error::{SceneError, SceneResult};
use crate::scene::{Block, Highlight, NodeId, ParagraphStyle, PenColor, Stroke};

/// Passthrough values for the meta blocks at the head of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub author_uuid: Uuid,
    pub migration_id: NodeId,
    pub is_device: bool,
    pub loads_count: u32,
    pub merges_count: u32,
    pub text_chars_count: u32,
    pub text_lines_count: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            author_uuid: Uuid::new_v4(),
            migration_id: NodeId::new(1, 1),
            is_device: true,
            loads_count: 1,
            merges_count: 0,
            text_chars_count: 0,
            text_lines_count: 0,
        }
    }
}

/// A stroke with the tool it was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStroke {
    pub id: NodeId,
    pub tool: Tool,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerHighlight {
    pub id: NodeId,
    pub highlight: Highlight,
}

/// A named, top-level group of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: NodeId,
    pub label: String,
    pub visible: bool,
    pub strokes: Vec<LayerStroke>,
    pub highlights: Vec<LayerHighlight>,
}

impl Layer {
    /// True when the layer holds no strokes and no highlights.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.highlights.is_empty()
    }
}

/// Root-level text placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnchor {
    pub position: Point,
    pub width: f64,
    pub style: ParagraphStyle,
    /// Display color; not carried by the text block.
    pub color: PenColor,
    pub text: String,
}

/// An in-memory page: layers in creation order, each owning its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    root_id: NodeId,
    layers: Vec<Layer>,
    ids: IdAllocator,
    root_texts: Vec<TextAnchor>,
    meta: PageMeta,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with fresh page meta.
    pub fn new() -> Self {
        Self::with_meta(PageMeta::default())
    }

    /// Empty document carrying `meta` into its meta blocks.
    pub fn with_meta(meta: PageMeta) -> Self {
        Self {
            root_id: NodeId::ROOT,
            layers: Vec::new(),
            ids: IdAllocator::new(),
            root_texts: Vec::new(),
            meta,
        }
    }

    /// Id of the scene root every layer hangs under.
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Layers in creation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer by id.
    pub fn layer(&self, id: NodeId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Mutable layer by id.
    pub fn layer_mut(&mut self, id: NodeId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// First layer carrying `label`.
    pub fn layer_by_label(&self, label: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.label == label)
    }

    pub(crate) fn layer_index(&self, label: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.label == label)
    }

    /// The allocator; the compiler draws link and timestamp ids from a copy.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Meta block values.
    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Mutable meta block values.
    pub fn meta_mut(&mut self) -> &mut PageMeta {
        &mut self.meta
    }

    /// Root-level text anchors in insertion order.
    pub fn root_texts(&self) -> &[TextAnchor] {
        &self.root_texts
    }

    /// Append a new layer and return its id.
    pub fn create_layer(&mut self, label: impl Into<String>, visible: bool) -> NodeId {
        let id = self.ids.next_id();
        self.layers.push(Layer {
            id,
            label: label.into(),
            visible,
            strokes: Vec::new(),
            highlights: Vec::new(),
        });
        id
    }

    /// Append `stroke` to `layer`, returning the stroke id.
    ///
    /// Fails with `UnknownLayer` if `layer` does not exist.
    pub fn add_stroke(&mut self, layer: NodeId, tool: Tool, stroke: Stroke) -> SceneResult<NodeId> {
        let index = self.index_of(layer)?;
        Ok(self.add_stroke_at(index, tool, stroke))
    }

    /// Append `highlight` to `layer`, returning its id.
    ///
    /// Fails with `UnknownLayer` if `layer` does not exist.
    pub fn add_highlight(&mut self, layer: NodeId, highlight: Highlight) -> SceneResult<NodeId> {
        let index = self.index_of(layer)?;
        Ok(self.add_highlight_at(index, highlight))
    }

    /// Queue a root-level text anchor.
    pub fn add_text(&mut self, anchor: TextAnchor) {
        self.root_texts.push(anchor);
    }

    pub(crate) fn add_stroke_at(&mut self, index: usize, tool: Tool, stroke: Stroke) -> NodeId {
        let id = self.ids.next_id();
        self.layers[index].strokes.push(LayerStroke { id, tool, stroke });
        id
    }

    pub(crate) fn add_highlight_at(&mut self, index: usize, highlight: Highlight) -> NodeId {
        let id = self.ids.next_id();
        self.layers[index]
            .highlights
            .push(LayerHighlight { id, highlight });
        id
    }

    pub(crate) fn set_visible_at(&mut self, index: usize, visible: bool) {
        self.layers[index].visible = visible;
    }

    fn index_of(&self, layer: NodeId) -> SceneResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == layer)
            .ok_or(SceneError::UnknownLayer(layer))
    }

    /// Strokes across all layers.
    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.strokes.len()).sum()
    }

    /// Highlights across all layers.
    pub fn highlight_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.highlights.len()).sum()
    }

    /// True when no layer has content and there is no root text.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty) && self.root_texts.is_empty()
    }

    /// Compile to the ordered block stream.
    pub fn compile(&self) -> Vec<Block> {
        crate::compile::compile(self)
    }

    /// Read a document back through `codec`.
    pub fn load(codec: &dyn SceneCodec, source: &[u8]) -> SceneResult<Self> {
        crate::load::load(codec, source)
    }

    /// Serialize the in-memory model (not the block stream) to JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Inverse of [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
