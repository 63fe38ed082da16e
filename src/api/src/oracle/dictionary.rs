use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use axum::async_trait;
use tracing::debug;

use super::{BotMove, Difficulty, WordOracle, WordVerdict};
use crate::game::bag::points_for_letter;
use crate::game::board::{words_formed, Board, START};
use crate::game::bot::decode_bot_move;
use crate::game::directions::Direction;
use crate::game::rack::{Rack, RACK_SIZE};
use crate::game::scoring::Scorer;
use crate::game::tile::{Tile, BLANK_LETTER};
use crate::game::Trie;

const MAX_SUGGESTIONS: usize = 10;

/// Word service backed by a local word list.
#[derive(Clone)]
pub struct DictionaryOracle {
    words: Arc<Trie>,
    scorer: Scorer,
}

impl DictionaryOracle {
    pub fn new(words: Trie) -> Self {
        Self {
            words: Arc::new(words),
            scorer: Scorer::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Trie::from_file(path)?))
    }

    /// Every dictionary word of two or more letters the given tiles can spell.
    /// Blanks stand in for any letter.
    pub fn words_from_letters(&self, letters: &str) -> BTreeSet<String> {
        let mut counts: BTreeMap<char, usize> = BTreeMap::new();
        let mut blanks = 0;
        for c in letters.chars() {
            if c == BLANK_LETTER || c == '?' {
                blanks += 1;
            } else if c.is_ascii_alphabetic() {
                *counts.entry(c.to_ascii_uppercase()).or_insert(0) += 1;
            }
        }

        let mut found = BTreeSet::new();
        collect_words(&self.words, &mut String::new(), &mut counts, &mut blanks, &mut found);
        found
    }

    /// Legal placements for the rack with their scores, lowest score first.
    fn candidate_moves(&self, rack: &Rack, board: &Board) -> Vec<(u32, BotMove)> {
        let mut proposals = Vec::new();

        if board.is_empty() {
            for word in self.words_from_letters(&rack.letters()) {
                let offset = word.len() / 2;
                proposals.push(BotMove {
                    start_row: START.0,
                    start_col: START.1.saturating_sub(offset),
                    direction: Direction::Horizontal,
                    word,
                });
            }
        } else {
            for (&(row, col), anchor) in board.iter() {
                let mut letters = rack.letters();
                letters.push(anchor.letter);
                for word in self.words_from_letters(&letters) {
                    for (index, _) in word.char_indices().filter(|(_, c)| *c == anchor.letter) {
                        for direction in [Direction::Horizontal, Direction::Vertical] {
                            if let Some((start_row, start_col)) = direction.backward((row, col), index) {
                                proposals.push(BotMove {
                                    word: word.clone(),
                                    start_row,
                                    start_col,
                                    direction,
                                });
                            }
                        }
                    }
                }
            }
        }

        let mut scored: Vec<(u32, BotMove)> = proposals
            .into_iter()
            .filter_map(|proposal| self.score_proposal(&proposal, rack, board).map(|s| (s, proposal)))
            .collect();
        scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.word.cmp(&b.1.word)));
        scored.dedup();
        scored
    }

    fn score_proposal(&self, proposal: &BotMove, rack: &Rack, board: &Board) -> Option<u32> {
        let placed = decode_bot_move(proposal, rack, board).ok()?;
        let words = words_formed(&placed, board).ok()?;
        let touches_board = board.is_empty() || placed.len() < proposal.word.len();
        if words.is_empty() || !touches_board || !words.iter().all(|w| self.words.search(&w.word)) {
            return None;
        }
        Some(self.scorer.score_words(&words, &placed))
    }
}

fn collect_words(
    node: &Trie,
    prefix: &mut String,
    counts: &mut BTreeMap<char, usize>,
    blanks: &mut usize,
    found: &mut BTreeSet<String>,
) {
    if prefix.len() >= 2 && node.is_word() {
        found.insert(prefix.clone());
    }

    for (c, child) in node.children() {
        let available = counts.get(&c).copied().unwrap_or(0);
        if available > 0 {
            counts.insert(c, available - 1);
            prefix.push(c);
            collect_words(child, prefix, counts, blanks, found);
            prefix.pop();
            counts.insert(c, available);
        } else if *blanks > 0 {
            *blanks -= 1;
            prefix.push(c);
            collect_words(child, prefix, counts, blanks, found);
            prefix.pop();
            *blanks += 1;
        }
    }
}

fn parse_rack(letters: &str) -> Result<Rack> {
    let tiles: Vec<Tile> = letters
        .chars()
        .filter(|c| *c == BLANK_LETTER || c.is_ascii_alphabetic())
        .map(|c| {
            if c == BLANK_LETTER {
                Tile::blank()
            } else {
                let letter = c.to_ascii_uppercase();
                Tile::new(letter, points_for_letter(letter))
            }
        })
        .collect();
    if tiles.len() > RACK_SIZE {
        bail!("a rack holds at most {} tiles, got {}", RACK_SIZE, tiles.len());
    }
    Ok(Rack::new(tiles))
}

#[async_trait]
impl WordOracle for DictionaryOracle {
    async fn validate_word(&self, word: &str) -> Result<WordVerdict> {
        if word.trim().chars().count() < 2 {
            Ok(WordVerdict::invalid("Words must be at least two letters long."))
        } else if self.words.search(word.trim()) {
            Ok(WordVerdict::valid("Found in dictionary."))
        } else {
            Ok(WordVerdict::invalid("Not found in dictionary."))
        }
    }

    async fn suggest_words(&self, tiles: &str, _board_state: &str) -> Result<Vec<String>> {
        let mut words: Vec<String> = self.words_from_letters(tiles).into_iter().collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.truncate(MAX_SUGGESTIONS);
        Ok(words)
    }

    async fn generate_bot_move(
        &self,
        tiles: &str,
        board_state: &str,
        difficulty: Difficulty,
    ) -> Result<Option<BotMove>> {
        let rack = parse_rack(tiles)?;
        let board: Board = serde_json::from_str(board_state)?;

        let mut candidates = self.candidate_moves(&rack, &board);
        debug!(count = candidates.len(), %difficulty, "Bot candidates");
        if candidates.is_empty() {
            return Ok(None);
        }

        let pick = match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => candidates.len() / 2,
            Difficulty::Hard => candidates.len() - 1,
        };
        Ok(Some(candidates.swap_remove(pick).1))
    }
}
