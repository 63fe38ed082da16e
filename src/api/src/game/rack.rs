use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tile::{Tile, BLANK_LETTER};

pub const RACK_SIZE: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tile '{letter}' is not in the rack")]
pub struct RackError {
    pub letter: char,
}

/// A player's hand. Order is cosmetic; size never exceeds `RACK_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rack(Vec<Tile>);

impl Rack {
    pub fn new(tiles: Vec<Tile>) -> Self {
        assert!(tiles.len() <= RACK_SIZE, "rack holds at most {} tiles", RACK_SIZE);
        Self(tiles)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rack letters as a string, blanks shown as spaces.
    pub fn letters(&self) -> String {
        self.0
            .iter()
            .map(|t| if t.is_blank_tile() { BLANK_LETTER } else { t.letter })
            .collect()
    }

    /// Face value of everything left in the rack.
    pub fn value(&self) -> u32 {
        self.0.iter().map(Tile::value).sum()
    }

    /// Takes one matching rack tile for each requested tile. A requested blank
    /// (whatever letter it was assigned) matches a rack blank; anything else
    /// matches by letter. All or nothing: on failure `self` is untouched.
    ///
    /// Returns the rack that remains and the rack tiles that were taken.
    pub fn remove(&self, requested: &[Tile]) -> Result<(Rack, Vec<Tile>), RackError> {
        let mut remaining = self.0.clone();
        let mut taken = Vec::with_capacity(requested.len());

        for wanted in requested {
            let index = remaining
                .iter()
                .position(|candidate| {
                    if wanted.is_blank_tile() {
                        candidate.is_blank_tile()
                    } else {
                        !candidate.is_blank_tile()
                            && candidate.letter.eq_ignore_ascii_case(&wanted.letter)
                    }
                })
                .ok_or(RackError {
                    letter: wanted.letter,
                })?;
            taken.push(remaining.remove(index));
        }

        Ok((Rack(remaining), taken))
    }

    pub fn refill(mut self, drawn: Vec<Tile>) -> Rack {
        assert!(
            self.0.len() + drawn.len() <= RACK_SIZE,
            "refill would overflow the rack: {} + {}",
            self.0.len(),
            drawn.len()
        );
        self.0.extend(drawn);
        self
    }
}
