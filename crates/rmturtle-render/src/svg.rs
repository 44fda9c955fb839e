//! SVG export.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use peniko::Color;
use rmturtle_core::Document;

use crate::palette::{self, Palette};
use crate::renderer::{RenderHighlight, RenderResult, RenderScene, RenderStroke, Renderer, RendererError};

/// Device page size in SVG units.
pub const DEFAULT_PAGE_SIZE: (f64, f64) = (1404.0, 1872.0);

const VIEW_PADDING: f64 = 8.0;

/// SVG export configuration.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub page_size: (f64, f64),
    /// Page-sized rectangle drawn under everything.
    pub background: Option<Color>,
    /// Keep hidden layers, styled `display:none`.
    pub include_hidden: bool,
    pub palette: Palette,
    /// Multiplier from the widest point width to `stroke-width`.
    pub stroke_width_scale: f64,
    pub highlight_opacity: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            background: None,
            include_hidden: false,
            palette: Palette::default(),
            stroke_width_scale: 0.2,
            highlight_opacity: 0.28,
        }
    }
}

impl SvgOptions {
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_hidden_layers(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

/// Renders a scene to an SVG string.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    options: SvgOptions,
}

impl SvgRenderer {
    pub fn new(options: SvgOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SvgOptions {
        &self.options
    }

    /// Render a document using this renderer's palette.
    pub fn render_document(&mut self, document: &Document) -> RenderResult<String> {
        let scene = RenderScene::from_document_with(document, &self.options.palette);
        self.render(&scene)
    }

    /// Render `document` and write it to `path`.
    pub fn save(&mut self, document: &Document, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let svg = self.render_document(document)?;
        fs::write(path, svg).map_err(|e| RendererError::Io(format!("{}: {e}", path.display())))?;
        log::info!("exported svg to {}", path.display());
        Ok(())
    }

    fn view_box(&self, scene: &RenderScene) -> (f64, f64, f64, f64) {
        match scene.bounds() {
            Some(bounds) => {
                let bounds = bounds.inflate(VIEW_PADDING, VIEW_PADDING);
                (bounds.x0, bounds.y0, bounds.width().max(1.0), bounds.height().max(1.0))
            }
            None => (0.0, 0.0, self.options.page_size.0, self.options.page_size.1),
        }
    }

    fn stroke_element(&self, out: &mut String, stroke: &RenderStroke) -> std::fmt::Result {
        let mut data = String::new();
        for element in stroke.path.elements() {
            let (command, point) = match *element {
                kurbo::PathEl::MoveTo(p) => ('M', p),
                kurbo::PathEl::LineTo(p) => ('L', p),
                _ => continue,
            };
            if !data.is_empty() {
                data.push(' ');
            }
            write!(data, "{command} {:.2},{:.2}", point.x, point.y)?;
        }
        let width = stroke.width * self.options.stroke_width_scale.max(0.01);
        writeln!(
            out,
            r#"    <path d="{data}" fill="none" stroke="{}" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round" />"#,
            palette::to_hex(stroke.color),
        )
    }

    fn highlight_element(&self, out: &mut String, highlight: &RenderHighlight) -> std::fmt::Result {
        let rect = highlight.rect;
        writeln!(
            out,
            r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}" opacity="{}" stroke="none" />"#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            palette::to_hex(highlight.color),
            self.options.highlight_opacity,
        )
    }

    fn write_svg(&self, scene: &RenderScene) -> Result<String, std::fmt::Error> {
        let (width, height) = self.options.page_size;
        let (vx, vy, vw, vh) = self.view_box(scene);

        let mut out = String::new();
        writeln!(out, r#"<?xml version="1.0" encoding="utf-8" ?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{width}" height="{height}" viewBox="{vx} {vy} {vw} {vh}">"#
        )?;

        if let Some(background) = self.options.background {
            writeln!(
                out,
                r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="{}" />"#,
                palette::to_hex(background)
            )?;
        }

        for (index, layer) in scene.layers.iter().enumerate() {
            if layer.is_empty() || (!layer.visible && !self.options.include_hidden) {
                continue;
            }
            if layer.visible {
                writeln!(out, r#"  <g id="layer-{index}">"#)?;
            } else {
                writeln!(out, r#"  <g id="layer-{index}" style="display:none">"#)?;
            }
            if !layer.name.is_empty() {
                writeln!(out, "    <title>{}</title>", escape(&layer.name))?;
            }
            for stroke in &layer.strokes {
                self.stroke_element(&mut out, stroke)?;
            }
            for highlight in &layer.highlights {
                self.highlight_element(&mut out, highlight)?;
            }
            writeln!(out, "  </g>")?;
        }

        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, scene: &RenderScene) -> RenderResult<String> {
        self.write_svg(scene)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use rmturtle_core::{Notebook, PenColor, Tool};
    use tempfile::TempDir;

    fn render(nb: &Notebook, options: SvgOptions) -> String {
        SvgRenderer::new(options).render_document(nb.document()).unwrap()
    }

    #[test]
    fn test_empty_document_uses_page_view_box() {
        let svg = render(&Notebook::new(), SvgOptions::default());
        assert!(svg.contains(r#"viewBox="0 0 1404 1872""#));
        assert!(!svg.contains("<g"));
    }

    #[test]
    fn test_view_box_padded_to_content() {
        let mut nb = Notebook::new();
        nb.layer("L").line(10.0, 20.0, 110.0, 70.0);
        let svg = render(&nb, SvgOptions::default());
        assert!(svg.contains(r#"viewBox="2 12 116 66""#));
        assert!(svg.contains(r#"width="1404" height="1872""#));
    }

    #[test]
    fn test_stroke_path_attributes() {
        let mut nb = Notebook::new();
        nb.layer("Lines");
        nb.tool(Tool::default().with_color(PenColor::Blue).with_width(10));
        nb.line(0.0, 0.0, 1.5, 2.25);
        let svg = render(&nb, SvgOptions::default());

        assert!(svg.contains(r#"d="M 0.00,0.00 L 1.50,2.25""#));
        assert!(svg.contains(r##"stroke="#1976d2""##));
        assert!(svg.contains(r#"stroke-width="2""#));
        assert!(svg.contains(r#"stroke-linecap="round""#));
        assert!(svg.contains("<title>Lines</title>"));
        assert!(svg.contains(r#"<g id="layer-0">"#));
    }

    #[test]
    fn test_hidden_layers() {
        let mut nb = Notebook::new();
        nb.layer("Shown").line(0.0, 0.0, 5.0, 5.0);
        nb.layer_with_visibility("Hidden", false).line(0.0, 0.0, 5.0, 5.0);

        let skipped = render(&nb, SvgOptions::default());
        assert!(!skipped.contains("layer-1"));

        let kept = render(&nb, SvgOptions::default().with_hidden_layers(true));
        assert!(kept.contains(r#"<g id="layer-1" style="display:none">"#));
    }

    #[test]
    fn test_highlight_and_background() {
        let mut nb = Notebook::new();
        nb.layer("H")
            .highlight("word", [Rect::new(10.0, 10.0, 50.0, 30.0)], PenColor::Yellow);
        let options = SvgOptions::default().with_background(Color::from_rgba8(255, 255, 255, 255));
        let svg = render(&nb, options);

        assert!(svg.contains(r##"<rect x="0" y="0" width="1404" height="1872" fill="#ffffff" />"##));
        assert!(svg.contains(
            r##"<rect x="10" y="10" width="40" height="20" fill="#f5d90a" opacity="0.28" stroke="none" />"##
        ));
    }

    #[test]
    fn test_layer_title_is_escaped() {
        let mut nb = Notebook::new();
        nb.layer("A & <B>").line(0.0, 0.0, 1.0, 1.0);
        let svg = render(&nb, SvgOptions::default());
        assert!(svg.contains("<title>A &amp; &lt;B&gt;</title>"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.svg");

        let mut nb = Notebook::new();
        nb.layer("L").circle(50.0, 50.0, 20.0);
        SvgRenderer::default().save(nb.document(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml"));
        assert!(written.trim_end().ends_with("</svg>"));
    }
}
