use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 15;

/// Letter carried by an unassigned blank while it sits in a rack or the bag.
pub const BLANK_LETTER: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub letter: char,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub is_blank: bool,
}

impl Tile {
    pub fn new(letter: char, score: u32) -> Self {
        Self {
            letter,
            score,
            is_blank: false,
        }
    }

    pub fn blank() -> Self {
        Self {
            letter: BLANK_LETTER,
            score: 0,
            is_blank: true,
        }
    }

    /// Older documents mark blanks only by the space letter.
    pub fn is_blank_tile(&self) -> bool {
        self.is_blank || self.letter == BLANK_LETTER
    }

    /// Face value used for scoring and rack penalties. Blanks are always worth nothing.
    pub fn value(&self) -> u32 {
        if self.is_blank_tile() {
            0
        } else {
            self.score
        }
    }

    pub fn place(&self, row: usize, col: usize) -> PlacedTile {
        PlacedTile {
            letter: self.letter,
            score: self.score,
            is_blank: self.is_blank,
            row,
            col,
        }
    }
}

/// A tile in flight for the move being built, not yet committed to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedTile {
    pub letter: char,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub is_blank: bool,
    pub row: usize,
    pub col: usize,
}

impl PlacedTile {
    pub fn tile(&self) -> Tile {
        Tile {
            letter: self.letter,
            score: self.score,
            is_blank: self.is_blank,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn in_bounds(&self) -> bool {
        in_bounds(self.row, self.col)
    }

    pub fn normalized(mut self) -> Self {
        self.letter = self.letter.to_ascii_uppercase();
        self
    }

    pub fn id(&self) -> String {
        cell_key(self.row, self.col)
    }
}

pub fn in_bounds(row: usize, col: usize) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

pub fn cell_key(row: usize, col: usize) -> String {
    format!("{}-{}", row, col)
}

/// Decodes a `row-col` key, rejecting anything outside the board.
pub fn parse_cell_key(key: &str) -> Option<(usize, usize)> {
    let (row, col) = key.split_once('-')?;
    let row = row.parse::<usize>().ok()?;
    let col = col.parse::<usize>().ok()?;
    in_bounds(row, col).then_some((row, col))
}
