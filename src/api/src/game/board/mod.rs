use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::conversion::SerializableBoard;
use crate::game::tile::{in_bounds, PlacedTile, Tile, BOARD_SIZE};

pub mod layout;
pub mod words;

pub use layout::{bonus_at, Bonus, START};
pub use words::{words_formed, FoundWord, PlacementError};

/// Committed tiles keyed by (row, col). Cells are only ever added, never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "SerializableBoard", try_from = "SerializableBoard")]
pub struct Board {
    cells: BTreeMap<(usize, usize), Tile>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        self.cells.get(&(row, col))
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells.contains_key(&(row, col))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &Tile)> {
        self.cells.iter()
    }

    /// Writes every placed tile to its cell. Callers have already checked the
    /// cells were free; this only commits.
    pub fn merge(&self, placed: &[PlacedTile]) -> Board {
        let mut next = self.clone();
        for tile in placed {
            next.cells.insert(tile.position(), tile.tile());
        }
        next
    }

    pub(crate) fn insert(&mut self, row: usize, col: usize, tile: Tile) -> bool {
        if !in_bounds(row, col) {
            return false;
        }
        self.cells.insert((row, col), tile);
        true
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.tile_at(row, col) {
                    Some(tile) if tile.is_blank => write!(f, " {} ", tile.letter.to_ascii_lowercase())?,
                    Some(tile) => write!(f, " {} ", tile.letter)?,
                    None => write!(f, " . ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
