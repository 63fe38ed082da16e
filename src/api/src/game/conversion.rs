use crate::game::board::Board;
use crate::game::tile::{cell_key, parse_cell_key, Tile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored board shape: `{"row-col": Tile}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializableBoard(pub BTreeMap<String, Tile>);

impl From<Board> for SerializableBoard {
    fn from(board: Board) -> Self {
        Self(
            board
                .iter()
                .map(|(&(row, col), tile)| (cell_key(row, col), tile.clone()))
                .collect(),
        )
    }
}

impl TryFrom<SerializableBoard> for Board {
    type Error = String;

    fn try_from(board: SerializableBoard) -> Result<Self, Self::Error> {
        let mut result = Board::new();
        for (key, tile) in board.0 {
            let (row, col) =
                parse_cell_key(&key).ok_or_else(|| format!("invalid board cell key '{}'", key))?;
            result.insert(row, col, tile);
        }
        Ok(result)
    }
}
