use std::path::PathBuf;

use thiserror::Error;

use crate::{extract::ExtractError, hints::client::LlmError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("Game data has no string `title`")]
    MissingTitle,

    #[error("Could not resolve feed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Could not set up the chat client: {0}")]
    Llm(#[from] LlmError),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Read { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Write { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        PipelineError::Json { path: path.into(), source }
    }
}
