//! Resolves the vendor feed into game data: every clue gets its answer by
//! reading the word's letters straight off the grid.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    feed::{Cell, Feed, Scalar, Word},
    game::{ClueEntry, GameData},
};

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("clue {number} refers to unknown word {word}")]
    UnknownWord { number: String, word: String },

    #[error("word {word}: malformed coordinate `{raw}`")]
    BadCoordinate { word: String, raw: String },

    #[error("word {word}: range `{raw}` runs backwards")]
    BackwardsRange { word: String, raw: String },

    #[error("word {word}: cell (row {row}, col {col}) is outside the grid")]
    OutOfGrid { word: String, row: usize, col: usize },

    #[error("word {word}: cell (row {row}, col {col}) has no letter")]
    MissingLetter { word: String, row: usize, col: usize },
}

/// A 1-based coordinate or an inclusive range of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Single(usize),
    Range(usize, usize),
}

impl Span {
    pub fn parse(word: &Scalar, raw: &Scalar) -> Result<Span, ExtractError> {
        let bad = || ExtractError::BadCoordinate {
            word: word.to_string(),
            raw:  raw.to_string(),
        };
        let index = |s: &str| -> Result<usize, ExtractError> {
            match s.trim().parse::<usize>() {
                Ok(0) | Err(_) => Err(bad()),
                Ok(n) => Ok(n),
            }
        };

        match raw {
            Scalar::Int(n) if *n > 0 => Ok(Span::Single(*n as usize)),
            Scalar::Int(_) => Err(bad()),
            Scalar::Text(s) => match s.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (index(start)?, index(end)?);
                    if end < start {
                        return Err(ExtractError::BackwardsRange {
                            word: word.to_string(),
                            raw:  s.clone(),
                        });
                    }
                    Ok(Span::Range(start, end))
                }
                None => Ok(Span::Single(index(s)?)),
            },
        }
    }
}

/// Where a word sits: its first cell, its length and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPath {
    pub row:    usize,
    pub col:    usize,
    pub len:    usize,
    pub across: bool,
}

impl WordPath {
    /// Grid positions `(row, col)`, 1-based, in reading order. Lazy, so a
    /// bogus range is never materialized.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.len).map(move |i| {
            if self.across {
                (self.row, self.col + i)
            } else {
                (self.row + i, self.col)
            }
        })
    }
}

pub fn word_path(word: &Word) -> Result<WordPath, ExtractError> {
    let x = Span::parse(&word.id, &word.x)?;
    let y = Span::parse(&word.id, &word.y)?;

    match (x, y) {
        (Span::Range(..), Span::Range(..)) => Err(ExtractError::BadCoordinate {
            word: word.id.to_string(),
            raw:  word.y.to_string(),
        }),
        (Span::Range(start, end), Span::Single(row)) => Ok(WordPath {
            row,
            col: start,
            len: end - start + 1,
            across: true,
        }),
        (Span::Single(col), Span::Range(start, end)) => Ok(WordPath {
            row: start,
            col,
            len: end - start + 1,
            across: false,
        }),
        (Span::Single(col), Span::Single(row)) => Ok(WordPath { row, col, len: 1, across: true }),
    }
}

/// Reads the answer for `word` off the grid.
pub fn read_answer(grid: &[Vec<Cell>], word: &Word) -> Result<String, ExtractError> {
    let mut answer = String::new();

    for (row, col) in word_path(word)?.cells() {
        let cell = grid
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .ok_or_else(|| ExtractError::OutOfGrid {
                word: word.id.to_string(),
                row,
                col,
            })?;

        let letter = cell
            .letter
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| ExtractError::MissingLetter {
                word: word.id.to_string(),
                row,
                col,
            })?;

        answer.push_str(letter);
    }

    Ok(answer)
}

pub fn extract(feed: Feed) -> Result<GameData, ExtractError> {
    let data = feed.data;
    let words: HashMap<&Scalar, &Word> = data.copy.words.iter().map(|w| (&w.id, w)).collect();

    let mut clues = Vec::new();
    for group in &data.copy.clues {
        let direction = group.title.to_lowercase();

        for clue in &group.clues {
            let word = words
                .get(&clue.word)
                .ok_or_else(|| ExtractError::UnknownWord {
                    number: clue.number.to_string(),
                    word:   clue.word.to_string(),
                })?;

            clues.push(ClueEntry {
                number:    clue.number.clone(),
                clue:      clue.clue.clone(),
                direction: direction.clone(),
                word_id:   clue.word.clone(),
                length:    clue.length.clone(),
                answer:    read_answer(&data.grid, word)?,
            });
        }
    }

    tracing::debug!(clues = clues.len(), words = words.len(), "Feed resolved");

    Ok(GameData {
        title: data.copy.title,
        grid:  data.grid,
        clues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cell(letter: &str) -> serde_json::Value {
        json!({ "Letter": letter, "Blank": "" })
    }

    fn block() -> serde_json::Value {
        json!({ "Blank": "blank" })
    }

    /// C A T
    /// O # .
    /// W . .
    fn sample_feed() -> serde_json::Value {
        json!({
            "data": {
                "grid": [
                    [cell("C"), cell("A"), cell("T")],
                    [cell("O"), block(),   block()],
                    [cell("W"), block(),   block()],
                ],
                "copy": {
                    "title": "Quick Cryptic 101",
                    "words": [
                        { "id": 1, "x": "1-3", "y": "1" },
                        { "id": "2", "x": "1", "y": "1-3" }
                    ],
                    "clues": [
                        { "title": "Across", "clues": [
                            { "number": 1, "clue": "Pet (3)", "word": 1, "length": 3 }
                        ]},
                        { "title": "Down", "clues": [
                            { "number": "1", "clue": "Dairy animal (3)", "word": "2", "length": "3" }
                        ]}
                    ]
                }
            }
        })
    }

    fn word(id: i64, x: &str, y: &str) -> Word {
        Word { id: id.into(), x: x.into(), y: y.into() }
    }

    #[test]
    fn test_extract_resolves_across_and_down() {
        let feed: Feed = serde_json::from_value(sample_feed()).unwrap();
        let game = extract(feed).unwrap();

        assert_eq!(game.title, "Quick Cryptic 101");
        assert_eq!(game.grid.len(), 3);
        assert_eq!(game.clues.len(), 2);

        let across = &game.clues[0];
        assert_eq!(across.direction, "across");
        assert_eq!(across.answer, "CAT");
        assert_eq!(across.word_id, Scalar::Int(1));

        let down = &game.clues[1];
        assert_eq!(down.direction, "down");
        assert_eq!(down.answer, "COW");
        assert_eq!(down.length, Scalar::Text("3".into()));
    }

    #[test]
    fn test_game_data_json_shape() {
        let feed: Feed = serde_json::from_value(sample_feed()).unwrap();
        let value = serde_json::to_value(extract(feed).unwrap()).unwrap();

        assert_eq!(
            value["clues"][0],
            json!({
                "number": 1,
                "clue": "Pet (3)",
                "direction": "across",
                "word_id": 1,
                "length": 3,
                "answer": "CAT"
            })
        );
        assert_eq!(value["grid"][1][1], json!({ "Blank": "blank" }));
    }

    #[test]
    fn test_span_parse() {
        let id = Scalar::Int(7);
        assert_eq!(Span::parse(&id, &"4".into()).unwrap(), Span::Single(4));
        assert_eq!(Span::parse(&id, &Scalar::Int(2)).unwrap(), Span::Single(2));
        assert_eq!(Span::parse(&id, &" 2-9 ".into()).unwrap(), Span::Range(2, 9));
        assert!(matches!(
            Span::parse(&id, &"9-2".into()),
            Err(ExtractError::BackwardsRange { .. })
        ));
        assert!(matches!(
            Span::parse(&id, &"0".into()),
            Err(ExtractError::BadCoordinate { .. })
        ));
        assert!(matches!(
            Span::parse(&id, &"a-b".into()),
            Err(ExtractError::BadCoordinate { .. })
        ));
    }

    #[test]
    fn test_word_path_single_square() {
        let cells: Vec<_> = word_path(&word(3, "2", "5")).unwrap().cells().collect();
        assert_eq!(cells, vec![(5, 2)]);
    }

    #[test]
    fn test_word_path_down() {
        let cells: Vec<_> = word_path(&word(3, "4", "2-4")).unwrap().cells().collect();
        assert_eq!(cells, vec![(2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn test_huge_range_is_out_of_grid() {
        let feed: Feed = serde_json::from_value(sample_feed()).unwrap();
        let err = read_answer(&feed.data.grid, &word(9, "1-18446744073709551615", "1")).unwrap_err();
        assert_eq!(err, ExtractError::OutOfGrid { word: "9".into(), row: 1, col: 4 });

        let err = read_answer(&[], &word(9, "1", "1-100000000000")).unwrap_err();
        assert_eq!(err, ExtractError::OutOfGrid { word: "9".into(), row: 1, col: 1 });
    }

    #[test]
    fn test_two_ranges_is_a_bad_coordinate() {
        let err = word_path(&word(5, "1-3", "1-3")).unwrap_err();
        assert_eq!(err, ExtractError::BadCoordinate { word: "5".into(), raw: "1-3".into() });
    }

    #[test]
    fn test_word_outside_grid_is_an_error() {
        let feed: Feed = serde_json::from_value(sample_feed()).unwrap();
        let err = read_answer(&feed.data.grid, &word(9, "2-4", "1")).unwrap_err();
        assert_eq!(err, ExtractError::OutOfGrid { word: "9".into(), row: 1, col: 4 });
    }

    #[test]
    fn test_word_through_block_is_an_error() {
        let feed: Feed = serde_json::from_value(sample_feed()).unwrap();
        let err = read_answer(&feed.data.grid, &word(9, "1-2", "2")).unwrap_err();
        assert_eq!(err, ExtractError::MissingLetter { word: "9".into(), row: 2, col: 2 });
    }

    #[test]
    fn test_unknown_word_is_an_error() {
        let mut raw = sample_feed();
        raw["data"]["copy"]["clues"][0]["clues"][0]["word"] = json!(42);
        let feed: Feed = serde_json::from_value(raw).unwrap();
        assert!(matches!(extract(feed), Err(ExtractError::UnknownWord { .. })));
    }
}
