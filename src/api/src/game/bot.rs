use super::board::Board;
use super::rack::Rack;
use super::tile::{in_bounds, PlacedTile};
use crate::oracle::BotMove;

/// Turns a proposed word into the tiles the bot would actually put down.
///
/// Cells already on the board must carry the same letter and are skipped.
/// Each empty cell takes a rack tile with that letter, or failing that a blank
/// which then stands for the letter. Any mismatch is reported as a reason string
/// and the caller passes the bot's turn instead.
pub fn decode_bot_move(proposal: &BotMove, rack: &Rack, board: &Board) -> Result<Vec<PlacedTile>, String> {
    let word = proposal.word.trim().to_ascii_uppercase();
    if word.is_empty() {
        return Err("bot proposed an empty word".to_string());
    }

    let origin = (proposal.start_row, proposal.start_col);
    let mut available: Vec<Option<_>> = rack.tiles().iter().cloned().map(Some).collect();
    let mut placed = Vec::new();

    for (index, letter) in word.chars().enumerate() {
        let (row, col) = proposal
            .direction
            .forward(origin, index)
            .filter(|&(row, col)| in_bounds(row, col))
            .ok_or_else(|| format!("'{}' runs off the board", word))?;

        if let Some(existing) = board.tile_at(row, col) {
            if !existing.letter.eq_ignore_ascii_case(&letter) {
                return Err(format!(
                    "cell {}-{} holds '{}', not '{}'",
                    row, col, existing.letter, letter
                ));
            }
            continue;
        }

        let slot = available
            .iter()
            .position(|t| matches!(t, Some(tile) if !tile.is_blank_tile() && tile.letter.eq_ignore_ascii_case(&letter)))
            .or_else(|| {
                available
                    .iter()
                    .position(|t| matches!(t, Some(tile) if tile.is_blank_tile()))
            })
            .ok_or_else(|| format!("rack has no tile for '{}'", letter))?;

        let Some(mut tile) = available[slot].take() else {
            return Err(format!("rack has no tile for '{}'", letter));
        };
        if tile.is_blank_tile() {
            tile.letter = letter;
            tile.score = 0;
            tile.is_blank = true;
        }
        placed.push(tile.place(row, col));
    }

    if placed.is_empty() {
        return Err(format!("'{}' places no new tiles", word));
    }
    Ok(placed)
}
