use serde::{Deserialize, Serialize};
use std::io::Write;

use super::{SceneCodec, WriteOptions};
use crate::error::{LoadStage, SceneError, SceneResult};
use crate::scene::Block;

/// Format tag written at the head of every scene file.
pub const FORMAT_TAG: &str = "rmturtle scene, version=6";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: &'a str,
    blocks: &'a [Block],
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    blocks: Vec<Block>,
}

/// JSON scene codec: `{format, version, blocks}` with blocks tagged by
/// `type`.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SceneCodec for JsonCodec {
    fn write(&self, sink: &mut dyn Write, blocks: &[Block], options: &WriteOptions) -> SceneResult<()> {
        let envelope = EnvelopeRef {
            format: FORMAT_TAG,
            version: &options.version,
            blocks,
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut *sink, &envelope)?;
        } else {
            serde_json::to_writer(&mut *sink, &envelope)?;
        }
        sink.flush().map_err(|e| SceneError::Io(e.to_string()))
    }

    fn read_blocks(&self, source: &[u8]) -> SceneResult<Vec<Block>> {
        let envelope: Envelope = serde_json::from_slice(source)
            .map_err(|e| SceneError::parse(LoadStage::Blocks, e.to_string()))?;
        if envelope.format != FORMAT_TAG {
            return Err(SceneError::parse(
                LoadStage::Blocks,
                format!("unexpected format tag {:?}", envelope.format),
            ));
        }
        Ok(envelope.blocks)
    }
}
