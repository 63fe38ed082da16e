use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::Board;
use crate::game::directions::Direction;
use crate::game::tile::PlacedTile;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("tile at {row}-{col} is off the board")]
    OffBoard { row: usize, col: usize },
    #[error("more than one tile placed on {0}")]
    DuplicateCell(String),
    #[error("cell {0} is already occupied")]
    Occupied(String),
    #[error("tiles must share a single row or column")]
    NotInLine,
    #[error("tiles must form a single continuous line")]
    Gap,
    #[error("tile at {0} needs a letter from A to Z")]
    NoLetter(String),
}

/// A contiguous run of two or more tiles formed by a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundWord {
    pub word: String,
    pub direction: Direction,
    pub tiles: Vec<PlacedTile>,
}

/// Board plus the pending tiles, as seen while walking words.
struct Overlay<'a> {
    board: &'a Board,
    pending: HashMap<(usize, usize), &'a PlacedTile>,
}

impl<'a> Overlay<'a> {
    fn new(board: &'a Board, placed: &'a [PlacedTile]) -> Self {
        Self {
            board,
            pending: placed.iter().map(|t| (t.position(), t)).collect(),
        }
    }

    fn tile_at(&self, (row, col): (usize, usize)) -> Option<PlacedTile> {
        if let Some(tile) = self.pending.get(&(row, col)) {
            return Some((*tile).clone());
        }
        self.board.tile_at(row, col).map(|tile| tile.place(row, col))
    }

    fn is_filled(&self, position: (usize, usize)) -> bool {
        self.pending.contains_key(&position) || self.board.is_occupied(position.0, position.1)
    }

    /// Walks back then forward from `start` over filled cells.
    fn word_through(&self, start: &PlacedTile, direction: Direction) -> Option<FoundWord> {
        let origin = start.position();
        let mut tiles = vec![start.clone()];

        let mut steps = 1;
        while let Some(position) = direction.backward(origin, steps) {
            match self.tile_at(position) {
                Some(tile) => tiles.insert(0, tile),
                None => break,
            }
            steps += 1;
        }

        let mut steps = 1;
        while let Some(position) = direction.forward(origin, steps) {
            match self.tile_at(position) {
                Some(tile) => tiles.push(tile),
                None => break,
            }
            steps += 1;
        }

        if tiles.len() < 2 {
            return None;
        }

        Some(FoundWord {
            word: tiles.iter().map(|t| t.letter).collect(),
            direction,
            tiles,
        })
    }
}

/// Checks the geometry of a placement and returns the line it lies on.
/// A single tile has no inherent direction.
pub fn check_placement(placed: &[PlacedTile], board: &Board) -> Result<Option<Direction>, PlacementError> {
    let mut seen = HashSet::new();
    for tile in placed {
        if !tile.letter.is_ascii_uppercase() {
            return Err(PlacementError::NoLetter(tile.id()));
        }
        if !tile.in_bounds() {
            return Err(PlacementError::OffBoard {
                row: tile.row,
                col: tile.col,
            });
        }
        if !seen.insert(tile.position()) {
            return Err(PlacementError::DuplicateCell(tile.id()));
        }
        if board.is_occupied(tile.row, tile.col) {
            return Err(PlacementError::Occupied(tile.id()));
        }
    }

    if placed.len() < 2 {
        return Ok(None);
    }

    let first = &placed[0];
    let direction = if placed.iter().all(|t| t.row == first.row) {
        Direction::Horizontal
    } else if placed.iter().all(|t| t.col == first.col) {
        Direction::Vertical
    } else {
        return Err(PlacementError::NotInLine);
    };

    let overlay = Overlay::new(board, placed);
    let positions = placed.iter().map(|t| direction.along(t.position()));
    let low = positions.clone().min().unwrap_or(0);
    let high = positions.max().unwrap_or(0);
    for offset in low..=high {
        let cell = match direction {
            Direction::Horizontal => (first.row, offset),
            Direction::Vertical => (offset, first.col),
        };
        if !overlay.is_filled(cell) {
            return Err(PlacementError::Gap);
        }
    }

    Ok(Some(direction))
}

/// Every word of two or more letters the placement forms: the main word along
/// the line of play, then any new cross words.
pub fn words_formed(placed: &[PlacedTile], board: &Board) -> Result<Vec<FoundWord>, PlacementError> {
    if placed.is_empty() {
        return Ok(vec![]);
    }

    let line = check_placement(placed, board)?;
    let overlay = Overlay::new(board, placed);
    let first = &placed[0];

    let main_direction = line.unwrap_or_else(|| {
        let across = [
            Direction::Horizontal.backward(first.position(), 1),
            Direction::Horizontal.forward(first.position(), 1),
        ];
        let has_horizontal_neighbor = across.iter().flatten().any(|&p| overlay.is_filled(p));
        let down = [
            Direction::Vertical.backward(first.position(), 1),
            Direction::Vertical.forward(first.position(), 1),
        ];
        let has_vertical_neighbor = down.iter().flatten().any(|&p| overlay.is_filled(p));
        if !has_horizontal_neighbor && has_vertical_neighbor {
            Direction::Vertical
        } else {
            Direction::Horizontal
        }
    });

    let mut words: Vec<FoundWord> = Vec::new();
    if let Some(main) = overlay.word_through(first, main_direction) {
        words.push(main);
    }

    let cross = main_direction.perpendicular();
    for tile in placed {
        if let Some(word) = overlay.word_through(tile, cross) {
            if !words.iter().any(|w| w.word == word.word) {
                words.push(word);
            }
        }
    }

    Ok(words)
}
