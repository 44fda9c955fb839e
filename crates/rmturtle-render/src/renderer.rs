//! Renderer trait abstraction and the read-only render scene.

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Color;
use rmturtle_core::document::{Document, Layer};
use rmturtle_core::{ParagraphStyle, Pen};
use thiserror::Error;

use crate::palette::Palette;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A stroke resolved to drawable geometry.
#[derive(Debug, Clone)]
pub struct RenderStroke {
    pub path: BezPath,
    pub color: Color,
    /// Widest point width, in device units.
    pub width: f64,
    pub pen: Pen,
}

impl RenderStroke {
    pub fn is_highlighter(&self) -> bool {
        self.pen.is_highlighter()
    }
}

/// A highlighted rectangle.
#[derive(Debug, Clone)]
pub struct RenderHighlight {
    pub rect: Rect,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct RenderLayer {
    pub name: String,
    pub visible: bool,
    pub strokes: Vec<RenderStroke>,
    pub highlights: Vec<RenderHighlight>,
}

impl RenderLayer {
    fn from_layer(layer: &Layer, palette: &Palette) -> Self {
        let strokes = layer
            .strokes
            .iter()
            .filter(|entry| entry.stroke.points.len() >= 2)
            .map(|entry| {
                let stroke = &entry.stroke;
                let mut path = BezPath::new();
                let mut points = stroke.points.iter().map(|p| p.position());
                if let Some(first) = points.next() {
                    path.move_to(first);
                }
                for p in points {
                    path.line_to(p);
                }
                RenderStroke {
                    path,
                    color: palette.get(stroke.color),
                    width: f64::from(stroke.max_width().max(1)),
                    pen: stroke.pen,
                }
            })
            .collect();

        let highlights = layer
            .highlights
            .iter()
            .flat_map(|entry| {
                let color = palette.get(entry.highlight.color);
                entry
                    .highlight
                    .rectangles
                    .iter()
                    .map(move |&rect| RenderHighlight { rect, color })
            })
            .collect();

        Self {
            name: layer.label.clone(),
            visible: layer.visible,
            strokes,
            highlights,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.highlights.is_empty()
    }
}

/// Root-level text positioned on the page.
#[derive(Debug, Clone)]
pub struct RenderText {
    pub origin: Point,
    pub width: f64,
    pub style: ParagraphStyle,
    pub color: Color,
    pub text: String,
}

/// Everything a renderer needs, detached from the document.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    pub layers: Vec<RenderLayer>,
    pub texts: Vec<RenderText>,
}

impl RenderScene {
    pub fn from_document(document: &Document) -> Self {
        Self::from_document_with(document, &Palette::default())
    }

    pub fn from_document_with(document: &Document, palette: &Palette) -> Self {
        let layers = document
            .layers()
            .iter()
            .map(|layer| RenderLayer::from_layer(layer, palette))
            .collect();
        let texts = document
            .root_texts()
            .iter()
            .map(|anchor| RenderText {
                origin: anchor.position,
                width: anchor.width,
                style: anchor.style,
                color: palette.get(anchor.color),
                text: anchor.text.clone(),
            })
            .collect();
        Self { layers, texts }
    }

    /// Bounds of all stroke points and highlight rectangles, hidden layers
    /// included.
    pub fn bounds(&self) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        let mut add = |rect: Rect| {
            bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
        };
        for layer in &self.layers {
            for stroke in &layer.strokes {
                add(stroke.path.bounding_box());
            }
            for highlight in &layer.highlights {
                add(highlight.rect);
            }
        }
        bounds
    }

    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.strokes.len()).sum()
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    type Output;

    /// Render a whole scene.
    fn render(&mut self, scene: &RenderScene) -> RenderResult<Self::Output>;
}
