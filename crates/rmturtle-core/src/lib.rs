//! rmturtle Core Library
//!
//! Turtle-style vector drawing that compiles to an ordered stream of scene
//! blocks, and loads such streams back into an editable document.

pub mod codec;
pub mod compile;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod load;
pub mod notebook;
pub mod scene;
pub mod transform;
pub mod turtle;

pub use codec::{JsonCodec, SceneCodec, WriteOptions};
pub use config::{AngleUnit, NotebookConfig};
pub use document::{Document, IdAllocator, Layer, LayerHighlight, LayerStroke, PageMeta, Presets, TextAnchor, Tool};
pub use error::{LoadStage, SceneError, SceneResult, StackKind};
pub use notebook::{FillOptions, Notebook, TextOptions, ToolScope, TransformScope};
pub use scene::{Block, NodeId, ParagraphStyle, Pen, PenColor, SceneTree};
pub use transform::TransformStack;
pub use turtle::Turtle;
