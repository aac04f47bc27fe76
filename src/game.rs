use serde::{Deserialize, Serialize};

use crate::feed::{Cell, Scalar};

/// The document handed to the page template: title, raw grid and one entry
/// per clue with its answer filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub title: String,
    pub grid:  Vec<Vec<Cell>>,
    pub clues: Vec<ClueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClueEntry {
    pub number:    Scalar,
    #[serde(default)]
    pub clue:      String,
    /// Lowercased clue group title, e.g. `across`.
    #[serde(default)]
    pub direction: String,
    pub word_id:   Scalar,
    pub length:    Scalar,
    #[serde(default)]
    pub answer:    String,
}

impl ClueEntry {
    /// Key used in `hints.json` and `explanations.json`.
    pub fn key(&self) -> String {
        self.word_id.to_string()
    }
}
