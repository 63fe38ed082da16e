use crate::game::board::{bonus_at, words_formed, Board, FoundWord, PlacementError};
use crate::game::rack::RACK_SIZE;
use crate::game::tile::PlacedTile;

pub const BINGO_BONUS: u32 = 50;

#[derive(Clone, Copy, Debug, Default)]
pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Self
    }

    /// Points for one word. Bonus squares only count under tiles placed this turn.
    pub fn score_word(&self, word: &FoundWord, placed: &[PlacedTile]) -> u32 {
        let mut letters = 0;
        let mut word_multiplier = 1;

        for tile in &word.tiles {
            let mut letter_score = if tile.is_blank { 0 } else { tile.score };
            let is_new = placed
                .iter()
                .any(|p| p.row == tile.row && p.col == tile.col);

            if is_new {
                let bonus = bonus_at(tile.row, tile.col);
                letter_score *= bonus.letter_multiplier();
                word_multiplier *= bonus.word_multiplier();
            }
            letters += letter_score;
        }

        letters * word_multiplier
    }

    /// Sum of every word plus the bingo bonus when a full rack goes down.
    pub fn score_words(&self, words: &[FoundWord], placed: &[PlacedTile]) -> u32 {
        let mut total: u32 = words.iter().map(|w| self.score_word(w, placed)).sum();
        if placed.len() == RACK_SIZE {
            total += BINGO_BONUS;
        }
        total
    }

    pub fn score_move(&self, placed: &[PlacedTile], board: &Board) -> Result<u32, PlacementError> {
        if placed.is_empty() {
            return Ok(0);
        }
        let words = words_formed(placed, board)?;
        Ok(self.score_words(&words, placed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::Tile;

    fn t(letter: char, score: u32, row: usize, col: usize) -> PlacedTile {
        Tile::new(letter, score).place(row, col)
    }

    #[test]
    fn test_cat_on_start_square() {
        let placed = vec![t('C', 3, 7, 7), t('A', 1, 7, 8), t('T', 1, 7, 9)];
        let score = Scorer::new().score_move(&placed, &Board::new()).unwrap();
        assert_eq!(score, 10);
    }

    #[test]
    fn test_letter_and_word_bonuses() {
        // Row 0: TW at col 0, DL at col 3.
        let placed = vec![
            t('Q', 10, 0, 0),
            t('U', 1, 0, 1),
            t('I', 1, 0, 2),
            t('Z', 10, 0, 3),
        ];
        let score = Scorer::new().score_move(&placed, &Board::new()).unwrap();
        assert_eq!(score, (10 + 1 + 1 + 20) * 3);
    }

    #[test]
    fn test_bonus_consumed_only_once() {
        let scorer = Scorer::new();
        let opening = vec![t('C', 3, 7, 7), t('A', 1, 7, 8), t('T', 1, 7, 9)];
        let board = Board::new().merge(&opening);

        // Extending CAT to CATS reuses the start square without its bonus.
        let placed = vec![t('S', 1, 7, 10)];
        assert_eq!(scorer.score_move(&placed, &board).unwrap(), 3 + 1 + 1 + 1);
    }

    #[test]
    fn test_blank_scores_zero_but_takes_word_bonus() {
        let mut blank = Tile::blank();
        blank.letter = 'C';
        let placed = vec![blank.place(7, 7), t('A', 1, 7, 8), t('T', 1, 7, 9)];
        let score = Scorer::new().score_move(&placed, &Board::new()).unwrap();
        assert_eq!(score, (1 + 1) * 2);
    }

    #[test]
    fn test_cross_words_are_summed() {
        let board = Board::new().merge(&[t('C', 3, 7, 7), t('A', 1, 7, 8), t('T', 1, 7, 9)]);
        // (8,8) is DL: AT = 2*1 + 1 = 3, AA = 1 + 2 = 3, TT = 1 + 1 = 2.
        let placed = vec![t('A', 1, 8, 8), t('T', 1, 8, 9)];
        assert_eq!(Scorer::new().score_move(&placed, &board).unwrap(), 8);
    }

    #[test]
    fn test_bingo_bonus_applied_once() {
        let word = "RETAINS";
        let placed: Vec<PlacedTile> = word
            .chars()
            .enumerate()
            .map(|(i, c)| t(c, 1, 7, 4 + i))
            .collect();
        // (7,7) is the start square; no letter bonuses on cols 4..=10 of row 7.
        let score = Scorer::new().score_move(&placed, &Board::new()).unwrap();
        assert_eq!(score, 7 * 2 + BINGO_BONUS);
    }

    #[test]
    fn test_zero_words_score_zero() {
        let score = Scorer::new()
            .score_move(&[t('A', 1, 3, 3)], &Board::new())
            .unwrap();
        assert_eq!(score, 0);
        assert_eq!(Scorer::new().score_move(&[], &Board::new()).unwrap(), 0);
    }
}
