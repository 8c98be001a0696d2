use crate::error::{EngineError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Difficulty bucket selecting which part of the corpus a passage comes from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    /// Following tier, wrapping from hard back to easy
    pub fn next(self) -> Tier {
        match self {
            Tier::Easy => Tier::Medium,
            Tier::Medium => Tier::Hard,
            Tier::Hard => Tier::Easy,
        }
    }
}

impl FromStr for Tier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            _ => Err(EngineError::UnknownTier(s.to_string())),
        }
    }
}

/// (word, letter) position inside a passage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CursorPosition {
    pub word: usize,
    pub letter: usize,
}

impl CursorPosition {
    pub fn new(word: usize, letter: usize) -> Self {
        Self { word, letter }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    #[default]
    Pending,
    Correct,
    Incorrect,
    Current,
}

/// A single status change, handed to the render sink for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterDelta {
    pub position: CursorPosition,
    pub status: LetterStatus,
}

impl LetterDelta {
    pub fn new(position: CursorPosition, status: LetterStatus) -> Self {
        Self { position, status }
    }
}

/// Target text split into words of letters. Casing and punctuation are kept
/// as-is; whitespace only separates words and is never typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    text: String,
    words: Vec<Vec<char>>,
}

impl Passage {
    pub fn parse(text: &str) -> Result<Self> {
        let words: Vec<Vec<char>> = text
            .split_whitespace()
            .map(|w| w.chars().collect())
            .collect();

        if words.is_empty() {
            return Err(EngineError::EmptyPassage);
        }

        Ok(Self {
            text: text.to_string(),
            words,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[Vec<char>] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn letter_count(&self) -> usize {
        self.words.iter().map(Vec::len).sum()
    }

    pub fn letter(&self, pos: CursorPosition) -> Option<char> {
        self.words
            .get(pos.word)
            .and_then(|w| w.get(pos.letter))
            .copied()
    }

    pub fn is_last_in_word(&self, pos: CursorPosition) -> bool {
        self.words
            .get(pos.word)
            .is_some_and(|w| pos.letter + 1 == w.len())
    }

    /// Position following `pos`, or `None` past the final letter
    pub fn next_position(&self, pos: CursorPosition) -> Option<CursorPosition> {
        if !self.is_last_in_word(pos) {
            return Some(CursorPosition::new(pos.word, pos.letter + 1));
        }
        if pos.word + 1 < self.words.len() {
            Some(CursorPosition::new(pos.word + 1, 0))
        } else {
            None
        }
    }
}
