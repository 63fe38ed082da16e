use serde::{Deserialize, Serialize};

use super::tile::BOARD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn perpendicular(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }

    /// (row, col) delta of one step forward along this axis.
    pub fn delta(self) -> (usize, usize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        }
    }

    /// The cell `steps` cells after (row, col), if it is on the board.
    pub fn forward(self, (row, col): (usize, usize), steps: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.delta();
        let next = (row.checked_add(dr * steps)?, col.checked_add(dc * steps)?);
        (next.0 < BOARD_SIZE && next.1 < BOARD_SIZE).then_some(next)
    }

    /// The cell `steps` cells before (row, col), if it is on the board.
    pub fn backward(self, (row, col): (usize, usize), steps: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.delta();
        Some((row.checked_sub(dr * steps)?, col.checked_sub(dc * steps)?))
    }

    /// Position of a cell along this axis.
    pub fn along(self, (row, col): (usize, usize)) -> usize {
        match self {
            Direction::Horizontal => col,
            Direction::Vertical => row,
        }
    }
}
