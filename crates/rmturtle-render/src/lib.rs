//! rmturtle Render Library
//!
//! Renderer abstraction over compiled scenes, with an SVG exporter.

pub mod palette;
mod renderer;
mod svg;

pub use palette::Palette;
pub use renderer::{
    RenderHighlight, RenderLayer, RenderResult, RenderScene, RenderStroke, RenderText, Renderer,
    RendererError,
};
pub use svg::{DEFAULT_PAGE_SIZE, SvgOptions, SvgRenderer};
