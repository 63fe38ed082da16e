use serde::{Deserialize, Serialize};

use crate::game::tile::BOARD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bonus {
    None,
    #[serde(rename = "DL")]
    DoubleLetter,
    #[serde(rename = "TL")]
    TripleLetter,
    #[serde(rename = "DW")]
    DoubleWord,
    #[serde(rename = "TW")]
    TripleWord,
    Start,
}

impl Bonus {
    pub fn letter_multiplier(self) -> u32 {
        match self {
            Bonus::DoubleLetter => 2,
            Bonus::TripleLetter => 3,
            _ => 1,
        }
    }

    /// The start square doubles the word like a DW.
    pub fn word_multiplier(self) -> u32 {
        match self {
            Bonus::DoubleWord | Bonus::Start => 2,
            Bonus::TripleWord => 3,
            _ => 1,
        }
    }
}

const __: Bonus = Bonus::None;
const DL: Bonus = Bonus::DoubleLetter;
const TL: Bonus = Bonus::TripleLetter;
const DW: Bonus = Bonus::DoubleWord;
const TW: Bonus = Bonus::TripleWord;
const ST: Bonus = Bonus::Start;

pub const START: (usize, usize) = (7, 7);

static LAYOUT: [[Bonus; BOARD_SIZE]; BOARD_SIZE] = [
    [TW, __, __, DL, __, __, __, TW, __, __, __, DL, __, __, TW],
    [__, DW, __, __, __, TL, __, __, __, TL, __, __, __, DW, __],
    [__, __, DW, __, __, __, DL, __, DL, __, __, __, DW, __, __],
    [DL, __, __, DW, __, __, __, DL, __, __, __, DW, __, __, DL],
    [__, __, __, __, DW, __, __, __, __, __, DW, __, __, __, __],
    [__, TL, __, __, __, TL, __, __, __, TL, __, __, __, TL, __],
    [__, __, DL, __, __, __, DL, __, DL, __, __, __, DL, __, __],
    [TW, __, __, DL, __, __, __, ST, __, __, __, DL, __, __, TW],
    [__, __, DL, __, __, __, DL, __, DL, __, __, __, DL, __, __],
    [__, TL, __, __, __, TL, __, __, __, TL, __, __, __, TL, __],
    [__, __, __, __, DW, __, __, __, __, __, DW, __, __, __, __],
    [DL, __, __, DW, __, __, __, DL, __, __, __, DW, __, __, DL],
    [__, __, DW, __, __, __, DL, __, DL, __, __, __, DW, __, __],
    [__, DW, __, __, __, TL, __, __, __, TL, __, __, __, DW, __],
    [TW, __, __, DL, __, __, __, TW, __, __, __, DL, __, __, TW],
];

/// Bonus printed on a cell. Off-board lookups read as no bonus.
pub fn bonus_at(row: usize, col: usize) -> Bonus {
    LAYOUT
        .get(row)
        .and_then(|cells| cells.get(col))
        .copied()
        .unwrap_or(Bonus::None)
}
