use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::validate::Explanation;
use crate::{error::PipelineError, store};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    /// Unix seconds of the last write.
    #[serde(default)]
    pub ts: i64,
}

/// Generated hints and explanations keyed by [`cache_key`], persisted as
/// one JSON object.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct HintCache {
    entries: BTreeMap<String, CacheEntry>,
}

/// A result is only reusable for the same model, prompt revision, clue text
/// and answer.
pub fn cache_key(model: &str, prompt_version: &str, clue: &str, answer: &str) -> String {
    let material = format!(
        "model={model}\nprompt_version={prompt_version}\nclue={}\nanswer={}",
        clue.trim(),
        answer.trim(),
    );
    hex::encode(Sha256::digest(material.as_bytes()))
}

impl HintCache {
    /// Missing or corrupt cache files load as empty. Entries are decoded one
    /// at a time so a single bad entry costs only itself.
    pub fn load(path: &Path) -> Self {
        let raw: BTreeMap<String, Value> = store::read_json_or_default(path);

        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) => Some((key, entry)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Dropping undecodable cache entry");
                    None
                }
            })
            .collect();

        Self { entries }
    }

    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        store::write_json(path, self)
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, hints: Vec<String>, explanation: Explanation) {
        let entry = CacheEntry {
            hints,
            explanation: Some(explanation),
            ts: chrono::Utc::now().timestamp(),
        };
        self.entries.insert(key, entry);
    }

    /// Attaches an explanation, keeping whatever hints are already cached
    /// unless there are none.
    pub fn set_explanation(&mut self, key: String, fallback_hints: Vec<String>, explanation: Explanation) {
        let hints = match self.entries.get(&key) {
            Some(entry) => entry.hints.clone(),
            None => fallback_hints,
        };
        self.insert(key, hints, explanation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
