use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_seeder::Seeder;
use serde::{Deserialize, Serialize};

use super::tile::{Tile, BLANK_LETTER};

/// Letter -> (points, count). The blank is keyed by its marker letter.
static DISTRIBUTION: phf::OrderedMap<char, (u32, usize)> = phf::phf_ordered_map! {
    'A' => (1, 9),
    'B' => (3, 2),
    'C' => (3, 2),
    'D' => (2, 4),
    'E' => (1, 12),
    'F' => (4, 2),
    'G' => (2, 3),
    'H' => (4, 2),
    'I' => (1, 9),
    'J' => (8, 1),
    'K' => (5, 1),
    'L' => (1, 4),
    'M' => (3, 2),
    'N' => (1, 6),
    'O' => (1, 8),
    'P' => (3, 2),
    'Q' => (10, 1),
    'R' => (1, 6),
    'S' => (1, 4),
    'T' => (1, 6),
    'U' => (1, 4),
    'V' => (4, 2),
    'W' => (4, 2),
    'X' => (8, 1),
    'Y' => (4, 2),
    'Z' => (10, 1),
    ' ' => (0, 2),
};

/// Points printed on a letter, or 0 for anything outside the distribution.
pub fn points_for_letter(letter: char) -> u32 {
    DISTRIBUTION
        .get(&letter.to_ascii_uppercase())
        .map(|(points, _)| *points)
        .unwrap_or(0)
}

pub fn total_tiles() -> usize {
    DISTRIBUTION.values().map(|(_, count)| count).sum()
}

/// The undrawn tiles. Treated as a value: drawing and returning hand back a new bag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileBag(Vec<Tile>);

impl TileBag {
    pub fn create() -> Self {
        Self::create_with_rng(&mut rand::thread_rng())
    }

    /// Same seed, same bag order.
    pub fn from_seed(seed: &str) -> Self {
        let mut rng = rand::rngs::StdRng::from_seed(Seeder::from(seed).make_seed());
        Self::create_with_rng(&mut rng)
    }

    pub fn create_with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut tiles = Vec::with_capacity(total_tiles());
        for (&letter, &(points, count)) in DISTRIBUTION.entries() {
            for _ in 0..count {
                if letter == BLANK_LETTER {
                    tiles.push(Tile::blank());
                } else {
                    tiles.push(Tile::new(letter, points));
                }
            }
        }
        tiles.shuffle(rng);
        Self(tiles)
    }

    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self(tiles)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    /// Takes up to `count` tiles off the end. A short bag yields a short draw.
    pub fn draw(mut self, count: usize) -> (Vec<Tile>, TileBag) {
        let keep = self.0.len().saturating_sub(count);
        let mut drawn = self.0.split_off(keep);
        drawn.reverse();
        (drawn, self)
    }

    pub fn return_and_reshuffle(self, returned: Vec<Tile>) -> TileBag {
        self.return_and_reshuffle_with_rng(returned, &mut rand::thread_rng())
    }

    pub fn return_and_reshuffle_with_rng<R: Rng>(mut self, returned: Vec<Tile>, rng: &mut R) -> TileBag {
        self.0.extend(returned);
        self.0.shuffle(rng);
        self
    }
}
