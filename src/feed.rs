//! Serde model of the vendor crossword feed.
//!
//! Only the fields the pipeline reads are typed. Grid cells keep every other
//! field so the grid can be handed to the page untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Feed {
    pub data: FeedData,
}

#[derive(Debug, Deserialize)]
pub struct FeedData {
    pub grid: Vec<Vec<Cell>>,
    pub copy: PuzzleCopy,
}

#[derive(Debug, Deserialize)]
pub struct PuzzleCopy {
    pub title: String,
    pub words: Vec<Word>,
    pub clues: Vec<ClueGroup>,
}

/// One square of the grid. Block squares usually carry no `Letter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "Letter", default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A word's position: `x` and `y` are 1-based and one of them may be a
/// range such as `"3-7"`.
#[derive(Debug, Clone, Deserialize)]
pub struct Word {
    pub id: Scalar,
    pub x:  Scalar,
    pub y:  Scalar,
}

#[derive(Debug, Deserialize)]
pub struct ClueGroup {
    pub title: String,
    pub clues: Vec<FeedClue>,
}

#[derive(Debug, Deserialize)]
pub struct FeedClue {
    pub number: Scalar,
    pub clue:   String,
    pub word:   Scalar,
    pub length: Scalar,
}

/// The feed is loose about types: ids, numbers and lengths show up both as
/// JSON numbers and as strings. Whichever form came in goes back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n)  => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}
