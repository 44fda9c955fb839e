//! Error types shared by the scene pipeline.

use std::fmt;

use thiserror::Error;

use crate::scene::NodeId;

/// Which save stack a `pop` ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Transform,
    Turtle,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Transform => write!(f, "transform"),
            StackKind::Turtle => write!(f, "turtle"),
        }
    }
}

/// Loader entry point that produced a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Materialized tree input.
    Tree,
    /// Flat block stream input.
    Blocks,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::Tree => write!(f, "tree"),
            LoadStage::Blocks => write!(f, "block"),
        }
    }
}

/// Scene errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Pop on empty {0} stack")]
    StackUnderflow(StackKind),
    #[error("Unknown layer: {0}")]
    UnknownLayer(NodeId),
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
    #[error("Parse error at {stage} stage: {message}")]
    Parse { stage: LoadStage, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl SceneError {
    /// Build a parse error for the given stage.
    pub fn parse(stage: LoadStage, message: impl Into<String>) -> Self {
        SceneError::Parse {
            stage,
            message: message.into(),
        }
    }

    /// Re-attribute this error to a loader stage, keeping its message.
    pub fn at_stage(self, stage: LoadStage) -> Self {
        match self {
            SceneError::Parse { message, .. } => SceneError::Parse { stage, message },
            other => SceneError::Parse {
                stage,
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::Serialization(err.to_string())
    }
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_stage() {
        let err = SceneError::parse(LoadStage::Blocks, "truncated");
        assert_eq!(err.to_string(), "Parse error at block stage: truncated");
    }

    #[test]
    fn test_at_stage_keeps_message() {
        let err = SceneError::parse(LoadStage::Blocks, "bad header").at_stage(LoadStage::Tree);
        match err {
            SceneError::Parse { stage, message } => {
                assert_eq!(stage, LoadStage::Tree);
                assert_eq!(message, "bad header");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_at_stage_wraps_other_errors() {
        let err = SceneError::Io("disk full".to_string()).at_stage(LoadStage::Blocks);
        assert!(matches!(
            err,
            SceneError::Parse { stage: LoadStage::Blocks, ref message } if message.contains("disk full")
        ));
    }

    #[test]
    fn test_underflow_display() {
        let err = SceneError::StackUnderflow(StackKind::Transform);
        assert_eq!(err.to_string(), "Pop on empty transform stack");
    }
}
