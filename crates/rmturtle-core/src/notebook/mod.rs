//! Chaining drawing surface over a [`Document`].
//!
//! ```no_run
//! use rmturtle_core::Notebook;
//!
//! let mut nb = Notebook::new();
//! nb.layer("Shapes");
//! for _ in 0..4 {
//!     nb.forward(150.0).left(90.0);
//! }
//! nb.stroke();
//! let blocks = nb.compile();
//! ```

mod scope;

pub use scope::{ToolScope, TransformScope};

use kurbo::{Point, Rect};
use std::io::Write;
use std::path::Path;

use crate::codec::{self, JsonCodec, SceneCodec, WriteOptions};
use crate::config::{AngleUnit, NotebookConfig};
use crate::document::{Document, Presets, TextAnchor, Tool};
use crate::error::SceneResult;
use crate::geometry::{self, Chord};
use crate::scene::{Block, Highlight, NodeId, ParagraphStyle, PenColor, StrokePoint};
use crate::transform::TransformStack;
use crate::turtle::Turtle;

/// Options for the `filled_*` shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FillOptions {
    /// Scanline spacing as a fraction of the pen width; the configured
    /// default when `None`.
    pub spacing_factor: Option<f64>,
    /// Add a perpendicular pass of chords.
    pub cross_hatch: bool,
    /// Also stroke the outline.
    pub edge_outline: bool,
}

impl FillOptions {
    /// Default spacing with a perpendicular chord pass.
    pub fn cross_hatched() -> Self {
        Self {
            cross_hatch: true,
            ..Self::default()
        }
    }

    /// Default spacing plus the shape outline.
    pub fn outlined() -> Self {
        Self {
            edge_outline: true,
            ..Self::default()
        }
    }
}

/// Options for root-level text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextOptions {
    /// Box width; the configured default when `None`.
    pub width: Option<f64>,
    pub style: ParagraphStyle,
    pub color: PenColor,
}

/// Turtle-style drawing surface that records into a [`Document`].
///
/// Drawing calls return `&mut Self` for chaining; calls that can underflow a
/// stack return a `SceneResult`.
#[derive(Debug, Clone)]
pub struct Notebook {
    document: Document,
    turtle: Turtle,
    transforms: TransformStack,
    tool: Tool,
    presets: Presets,
    config: NotebookConfig,
    current_layer: Option<usize>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Notebook {
    /// Notebook over an empty document with the default config.
    pub fn new() -> Self {
        Self::with_config(NotebookConfig::default())
    }

    /// Notebook over an empty document.
    pub fn with_config(config: NotebookConfig) -> Self {
        Self::from_parts(Document::new(), config)
    }

    /// Continue drawing on an existing document.
    pub fn from_document(document: Document) -> Self {
        Self::from_parts(document, NotebookConfig::default())
    }

    fn from_parts(document: Document, config: NotebookConfig) -> Self {
        Self {
            document,
            turtle: Turtle::new(),
            transforms: TransformStack::new(),
            tool: Tool::default(),
            presets: Presets::default(),
            config,
            current_layer: None,
        }
    }

    /// Load a document through `codec` and continue drawing on it.
    pub fn load(codec: &dyn SceneCodec, source: &[u8]) -> SceneResult<Self> {
        Document::load(codec, source).map(Self::from_document)
    }

    /// Load a scene file written by [`save`](Self::save).
    pub fn open(path: impl AsRef<Path>) -> SceneResult<Self> {
        let bytes = codec::read_file(path.as_ref())?;
        Self::load(&JsonCodec::default(), &bytes)
    }

    /// Active configuration.
    pub fn config(&self) -> &NotebookConfig {
        &self.config
    }

    /// The document drawn so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the notebook, keeping its document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Cursor and open path state.
    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    fn radians(&self, angle: f64) -> f64 {
        self.config.angle_unit.to_radians(angle)
    }

    // --- Layers ---

    /// Select the layer labelled `name`, creating a visible one on first use.
    pub fn layer(&mut self, name: &str) -> &mut Self {
        let index = match self.document.layer_index(name) {
            Some(index) => index,
            None => {
                self.document.create_layer(name, true);
                self.document.layers().len() - 1
            }
        };
        self.current_layer = Some(index);
        self
    }

    /// Select or create the layer labelled `name` and set its visibility.
    pub fn layer_with_visibility(&mut self, name: &str, visible: bool) -> &mut Self {
        self.layer(name);
        if let Some(index) = self.current_layer {
            self.document.set_visible_at(index, visible);
        }
        self
    }

    /// Id of the selected layer, if any.
    pub fn current_layer(&self) -> Option<NodeId> {
        self.current_layer
            .map(|index| self.document.layers()[index].id)
    }

    fn ensure_layer(&mut self) -> usize {
        if let Some(index) = self.current_layer {
            return index;
        }
        let name = self.config.default_layer.clone();
        self.layer(&name);
        self.current_layer.unwrap_or(0)
    }

    // --- Tools ---

    /// Replace the active tool.
    pub fn tool(&mut self, tool: Tool) -> &mut Self {
        self.tool = tool;
        self
    }

    /// The active tool.
    pub fn current_tool(&self) -> Tool {
        self.tool
    }

    /// Use `tool` until the returned guard is dropped.
    pub fn tool_scope(&mut self, tool: Tool) -> ToolScope<'_> {
        ToolScope::new(self, tool)
    }

    /// Add or replace a named preset.
    pub fn define_preset(&mut self, name: impl Into<String>, tool: Tool) -> &mut Self {
        self.presets.define(name, tool);
        self
    }

    /// Make the named preset the active tool.
    pub fn use_preset(&mut self, name: &str) -> SceneResult<&mut Self> {
        self.tool = self.presets.get(name)?;
        Ok(self)
    }

    /// Use the named preset until the returned guard is dropped.
    pub fn preset_scope(&mut self, name: &str) -> SceneResult<ToolScope<'_>> {
        let tool = self.presets.get(name)?;
        Ok(ToolScope::new(self, tool))
    }

    // --- Turtle ---

    /// Cursor position.
    pub fn position(&self) -> Point {
        self.turtle.position()
    }

    /// Heading in the active angle unit.
    pub fn heading(&self) -> f64 {
        self.config.angle_unit.from_radians(self.turtle.heading())
    }

    /// Interpret angles as degrees (`true`) or radians.
    pub fn set_degrees(&mut self, degrees: bool) -> &mut Self {
        self.config.angle_unit = if degrees {
            AngleUnit::Degrees
        } else {
            AngleUnit::Radians
        };
        self
    }

    /// Set the absolute heading in the active angle unit.
    pub fn set_heading(&mut self, angle: f64) -> &mut Self {
        let angle = self.radians(angle);
        self.turtle.set_heading(angle);
        self
    }

    /// Increase the heading by `angle`.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        let angle = self.radians(angle);
        self.turtle.rotate(angle);
        self
    }

    /// Same as [`rotate`](Self::rotate).
    pub fn left(&mut self, angle: f64) -> &mut Self {
        self.rotate(angle)
    }

    /// Decrease the heading by `angle`.
    pub fn right(&mut self, angle: f64) -> &mut Self {
        self.rotate(-angle)
    }

    /// Move along the heading, extending the path while the pen is down.
    pub fn forward(&mut self, distance: f64) -> &mut Self {
        self.turtle.forward(distance, &self.tool);
        self
    }

    /// Start recording; seeds the path with the cursor.
    pub fn pen_down(&mut self) -> &mut Self {
        self.turtle.pen_down(&self.tool);
        self
    }

    /// Stop recording; later moves leave no trace.
    pub fn pen_up(&mut self) -> &mut Self {
        self.turtle.pen_up();
        self
    }

    /// Jump to `(x, y)` and discard the open path.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.turtle.move_to(Point::new(x, y));
        self
    }

    /// Same as [`line_to`](Self::line_to).
    pub fn goto(&mut self, x: f64, y: f64) -> &mut Self {
        self.line_to(x, y)
    }

    /// Go to the origin and face +x.
    pub fn home(&mut self) -> &mut Self {
        self.goto(0.0, 0.0);
        self.turtle.set_heading(0.0);
        self
    }

    /// Save the turtle state, optionally with the active tool.
    pub fn push(&mut self, include_tool: bool) -> &mut Self {
        self.turtle.push(include_tool.then_some(self.tool));
        self
    }

    /// Restore the last pushed turtle state, and the tool if it was saved.
    ///
    /// The open path is discarded.
    pub fn pop(&mut self) -> SceneResult<&mut Self> {
        if let Some(tool) = self.turtle.pop()? {
            self.tool = tool;
        }
        Ok(self)
    }

    // --- Paths ---

    /// Start a new path at the cursor, whatever the pen state.
    pub fn begin_path(&mut self) -> &mut Self {
        self.turtle.begin_path(&self.tool);
        self
    }

    /// Extend the path with a straight segment to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.turtle.line_to(Point::new(x, y), &self.tool);
        self
    }

    /// Extend the path with a sampled quadratic curve.
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        let samples = self.config.quad_samples;
        self.turtle
            .quad_to(Point::new(cx, cy), Point::new(x, y), samples, &self.tool);
        self
    }

    /// Extend the path with a sampled cubic curve.
    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        let samples = self.config.cubic_samples;
        self.turtle.cubic_to(
            Point::new(c1x, c1y),
            Point::new(c2x, c2y),
            Point::new(x, y),
            samples,
            &self.tool,
        );
        self
    }

    /// Repeat the first path point if the path does not end there.
    pub fn close_path(&mut self) -> &mut Self {
        self.turtle.close_path(&self.tool);
        self
    }

    /// Commit the open path with the active tool and transform.
    pub fn stroke(&mut self) -> &mut Self {
        let tool = self.tool;
        self.stroke_with(tool)
    }

    /// Commit the open path drawn with `tool`.
    pub fn stroke_with(&mut self, tool: Tool) -> &mut Self {
        let path = self.turtle.take_path();
        self.commit(path, tool);
        self
    }

    fn commit(&mut self, points: Vec<StrokePoint>, tool: Tool) {
        if points.len() < 2 {
            log::trace!("discarding path with {} point(s)", points.len());
            return;
        }
        let transforms = &self.transforms;
        let points = if transforms.is_identity() {
            points
        } else {
            points
                .into_iter()
                .map(|p| p.with_position(transforms.apply(p.position())))
                .collect()
        };
        let index = self.ensure_layer();
        self.document.add_stroke_at(index, tool, tool.stroke(points));
    }

    fn commit_shape(&mut self, points: Vec<Point>) -> &mut Self {
        let tool = self.tool;
        let stamped = points.into_iter().map(|p| tool.stamp(p)).collect();
        self.commit(stamped, tool);
        self
    }

    fn commit_chords(&mut self, chords: Vec<Chord>) {
        for (a, b) in chords {
            self.commit_shape(vec![a, b]);
        }
    }

    // --- Primitives ---

    /// Commit `points` as one stroke, closed on request.
    pub fn polyline(&mut self, points: impl IntoIterator<Item = (f64, f64)>, close: bool) -> &mut Self {
        let mut points: Vec<Point> = points.into_iter().map(Point::from).collect();
        if close {
            geometry::close(&mut points);
        }
        self.commit_shape(points)
    }

    /// Two-point stroke.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        self.commit_shape(vec![Point::new(x1, y1), Point::new(x2, y2)])
    }

    /// Closed axis-aligned rectangle with its corner at `(x, y)`.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.commit_shape(geometry::rectangle(x, y, w, h))
    }

    /// Equilateral triangle, apex up, centered on `(cx, cy)`.
    pub fn triangle(&mut self, cx: f64, cy: f64, size: f64) -> &mut Self {
        self.commit_shape(geometry::triangle(Point::new(cx, cy), size))
    }

    /// Closed circle with the configured segment count.
    pub fn circle(&mut self, cx: f64, cy: f64, r: f64) -> &mut Self {
        let segments = self.config.circle_segments;
        self.commit_shape(geometry::circle(Point::new(cx, cy), r, segments))
    }

    /// Closed regular polygon; fewer than three sides draws nothing.
    pub fn regular_polygon(&mut self, n: usize, cx: f64, cy: f64, r: f64, rotation: f64) -> &mut Self {
        let rotation = self.radians(rotation);
        self.commit_shape(geometry::regular_polygon(n, Point::new(cx, cy), r, rotation))
    }

    /// Closed star alternating the outer radius and `r * inner_ratio`.
    pub fn star(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        points: usize,
        inner_ratio: f64,
        rotation: f64,
    ) -> &mut Self {
        let rotation = self.radians(rotation);
        self.commit_shape(geometry::star(points, Point::new(cx, cy), r, inner_ratio, rotation))
    }

    /// Closed ellipse rotated by `rotation`.
    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64) -> &mut Self {
        let rotation = self.radians(rotation);
        let segments = self.config.ellipse_segments;
        self.commit_shape(geometry::ellipse(Point::new(cx, cy), rx, ry, rotation, segments))
    }

    /// Open arc from `start` through `sweep`.
    pub fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, sweep: f64) -> &mut Self {
        let (start, sweep) = (self.radians(start), self.radians(sweep));
        let segments = self.config.arc_segments;
        self.commit_shape(geometry::arc(Point::new(cx, cy), r, start, sweep, segments))
    }

    /// Rounded rectangle with the configured radius.
    pub fn rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let (radius, segments) = (self.config.corner_radius, self.config.corner_segments);
        self.rounded_rect_with(x, y, w, h, radius, segments)
    }

    /// Rounded rectangle with an explicit radius and corner segment count.
    pub fn rounded_rect_with(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        segments: usize,
    ) -> &mut Self {
        self.commit_shape(geometry::rounded_rect(x, y, w, h, radius, segments))
    }

    // --- Fills ---

    fn fill_spacing(&self, options: &FillOptions) -> f64 {
        let factor = options
            .spacing_factor
            .unwrap_or(self.config.fill_spacing_factor);
        geometry::scanline_spacing(self.tool.effective_width(), factor)
    }

    /// Fill a rectangle with horizontal two-point chords.
    pub fn filled_rect(&mut self, x: f64, y: f64, w: f64, h: f64, options: FillOptions) -> &mut Self {
        let spacing = self.fill_spacing(&options);
        self.commit_chords(geometry::fill_rect(x, y, w, h, spacing));
        if options.cross_hatch {
            let outline = geometry::rectangle(x, y, w, h);
            self.commit_chords(geometry::fill_polygon(&outline, spacing, std::f64::consts::FRAC_PI_2));
        }
        if options.edge_outline {
            self.rect(x, y, w, h);
        }
        self
    }

    /// Fill an ellipse with chords parallel to its rotated x axis.
    pub fn filled_ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        options: FillOptions,
    ) -> &mut Self {
        let spacing = self.fill_spacing(&options);
        let center = Point::new(cx, cy);
        let angle = self.radians(rotation);
        self.commit_chords(geometry::fill_ellipse(center, rx, ry, angle, spacing));
        if options.cross_hatch {
            // same ellipse with its axes swapped, scanned the other way
            let turned = angle + std::f64::consts::FRAC_PI_2;
            self.commit_chords(geometry::fill_ellipse(center, ry, rx, turned, spacing));
        }
        if options.edge_outline {
            self.ellipse(cx, cy, rx, ry, rotation);
        }
        self
    }

    /// Even-odd scanline fill of a polygon.
    pub fn filled_polygon(
        &mut self,
        points: impl IntoIterator<Item = (f64, f64)>,
        options: FillOptions,
    ) -> &mut Self {
        let mut outline: Vec<Point> = points.into_iter().map(Point::from).collect();
        let spacing = self.fill_spacing(&options);
        self.commit_chords(geometry::fill_polygon(&outline, spacing, 0.0));
        if options.cross_hatch {
            self.commit_chords(geometry::fill_polygon(&outline, spacing, std::f64::consts::FRAC_PI_2));
        }
        if options.edge_outline {
            geometry::close(&mut outline);
            self.commit_shape(outline);
        }
        self
    }

    // --- Transforms ---

    /// Save the active transform.
    pub fn tf_push(&mut self) -> &mut Self {
        self.transforms.push();
        self
    }

    /// Restore the last saved transform.
    pub fn tf_pop(&mut self) -> SceneResult<&mut Self> {
        self.transforms.pop()?;
        Ok(self)
    }

    /// Translate in the current local frame.
    pub fn tf_translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.transforms.translate(dx, dy);
        self
    }

    /// Scale in the current local frame.
    pub fn tf_scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.transforms.scale(sx, sy);
        self
    }

    /// Rotate the local frame by `angle`.
    pub fn tf_rotate(&mut self, angle: f64) -> &mut Self {
        let angle = self.radians(angle);
        self.transforms.rotate(angle);
        self
    }

    /// Push the transform; the guard pops back on drop.
    pub fn transform_scope(&mut self) -> TransformScope<'_> {
        TransformScope::new(self)
    }

    // --- Text and highlights ---

    /// Queue a root-level text anchor.
    pub fn text(&mut self, x: f64, y: f64, content: impl Into<String>, options: TextOptions) -> &mut Self {
        self.document.add_text(TextAnchor {
            position: Point::new(x, y),
            width: options.width.unwrap_or(self.config.text_width),
            style: options.style,
            color: options.color,
            text: content.into(),
        });
        self
    }

    /// Add a highlight over `rects` to the current layer.
    pub fn highlight(
        &mut self,
        text: impl Into<String>,
        rects: impl IntoIterator<Item = Rect>,
        color: PenColor,
    ) -> &mut Self {
        let highlight = Highlight::new(text, color, rects.into_iter().collect());
        let index = self.ensure_layer();
        self.document.add_highlight_at(index, highlight);
        self
    }

    // --- Output ---

    /// Compile the document to its block stream.
    pub fn compile(&self) -> Vec<Block> {
        self.document.compile()
    }

    /// Write the compiled scene to `sink` through `codec`.
    pub fn write(&self, codec: &dyn SceneCodec, sink: &mut dyn Write) -> SceneResult<()> {
        let options = WriteOptions::new(self.config.format_version.clone());
        codec.write(sink, &self.compile(), &options)
    }

    /// Write the compiled scene to `path` with the JSON codec.
    pub fn save(&self, path: impl AsRef<Path>) -> SceneResult<()> {
        let options = WriteOptions::new(self.config.format_version.clone());
        codec::write_file(path.as_ref(), &JsonCodec::default(), &self.compile(), &options)
    }
}
