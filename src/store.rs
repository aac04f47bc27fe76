//! JSON file helpers shared by every stage.

use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PipelineError;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let raw = fs::read_to_string(path).map_err(|e| PipelineError::read(path, e))?;
    serde_json::from_str(&raw).map_err(|e| PipelineError::json(path, e))
}

/// Like [`read_json`], but a missing or unreadable file yields `T::default()`.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path) {
        Ok(value) => value,
        Err(PipelineError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            T::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable file");
            T::default()
        }
    }
}

/// Pretty-prints `value` to `path` through a sibling `.tmp` file so readers
/// never see a half-written document.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let body = serde_json::to_string_pretty(value)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    fs::write(&tmp, body).map_err(|e| PipelineError::write(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| PipelineError::write(path, e))
}

pub fn write_text(path: &Path, body: &str) -> Result<(), PipelineError> {
    fs::write(path, body).map_err(|e| PipelineError::write(path, e))
}
