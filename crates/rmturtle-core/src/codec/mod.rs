//! Codec boundary: writing and reading block streams.

mod json;

pub use json::{FORMAT_TAG, JsonCodec};

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{LoadStage, SceneError, SceneResult};
use crate::scene::{Block, SceneTree};

/// Options passed to [`SceneCodec::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Format version string stamped into the output.
    pub version: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new("3.1")
    }
}

impl WriteOptions {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

/// Serializer for block streams.
///
/// Only `write` and `read_blocks` are required; the default `read_tree`
/// materializes the tree from the block stream.
pub trait SceneCodec {
    fn write(&self, sink: &mut dyn Write, blocks: &[Block], options: &WriteOptions) -> SceneResult<()>;

    fn read_blocks(&self, source: &[u8]) -> SceneResult<Vec<Block>>;

    fn read_tree(&self, source: &[u8]) -> SceneResult<SceneTree> {
        let blocks = self
            .read_blocks(source)
            .map_err(|err| err.at_stage(LoadStage::Tree))?;
        SceneTree::from_blocks(&blocks)
    }
}

/// Read a whole scene file.
pub fn read_file(path: &Path) -> SceneResult<Vec<u8>> {
    fs::read(path).map_err(|e| SceneError::Io(format!("{}: {e}", path.display())))
}

/// Write `blocks` to `path` through `codec`, replacing any existing file.
pub fn write_file(
    path: &Path,
    codec: &dyn SceneCodec,
    blocks: &[Block],
    options: &WriteOptions,
) -> SceneResult<()> {
    let mut buffer = Vec::new();
    codec.write(&mut buffer, blocks, options)?;
    fs::write(path, buffer).map_err(|e| SceneError::Io(format!("{}: {e}", path.display())))?;
    log::debug!("wrote {} block(s) to {}", blocks.len(), path.display());
    Ok(())
}
