//! The word service the game leans on: dictionary checks, hints and bot moves.
//! Implementations may be slow or nondeterministic; the engine only relies on
//! the shapes below.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use axum::async_trait;
use serde::{Deserialize, Serialize};

use crate::game::directions::Direction;

pub mod dictionary;

pub use dictionary::DictionaryOracle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordVerdict {
    pub is_valid: bool,
    pub reason: String,
}

impl WordVerdict {
    pub fn valid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }
}

/// A proposed bot play: a word laid from a start cell in one direction,
/// possibly running through tiles already on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMove {
    pub word: String,
    pub start_row: usize,
    pub start_col: usize,
    pub direction: Direction,
}

/// Serialized by name; parsing ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.to_string()
    }
}

#[async_trait]
pub trait WordOracle: Send + Sync {
    async fn validate_word(&self, word: &str) -> Result<WordVerdict>;

    /// Advisory only; never changes a game.
    async fn suggest_words(&self, tiles: &str, board_state: &str) -> Result<Vec<String>>;

    /// `Ok(None)` means the bot found nothing to play.
    async fn generate_bot_move(
        &self,
        tiles: &str,
        board_state: &str,
        difficulty: Difficulty,
    ) -> Result<Option<BotMove>>;
}
