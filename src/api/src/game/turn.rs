use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::board::{words_formed, FoundWord};
use super::bot::decode_bot_move;
use super::error::GameError;
use super::rack::{Rack, RACK_SIZE};
use super::scoring::Scorer;
use super::session::GameSession;
use super::tile::{PlacedTile, Tile};
use crate::oracle::{Difficulty, WordOracle};

pub const DEFAULT_BOT_ID: &str = "bitty-botty-001";

/// What a committed turn did, for the caller to report back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TurnOutcome {
    #[serde(rename_all = "camelCase")]
    Played { score: u32, words: Vec<String>, tiles_placed: usize },
    #[serde(rename_all = "camelCase")]
    Passed { consecutive_passes: u32 },
    Exchanged { count: usize },
    BotPassed { reason: String },
    Hint { suggestions: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: GameSession,
    pub outcome: TurnOutcome,
}

/// A play that passed every local rule and now only waits on word validation.
#[derive(Debug, Clone)]
pub struct PreparedPlay {
    uid: String,
    placed: Vec<PlacedTile>,
    words: Vec<FoundWord>,
    remaining_rack: Rack,
}

impl PreparedPlay {
    pub fn words(&self) -> &[FoundWord] {
        &self.words
    }

    pub fn placed(&self) -> &[PlacedTile] {
        &self.placed
    }
}

impl GameSession {
    /// Every check a play can fail without asking the word service.
    pub fn prepare_play(&self, uid: &str, pending: &[PlacedTile]) -> Result<PreparedPlay, GameError> {
        self.ensure_can_act(uid)?;
        if pending.is_empty() {
            return Err(GameError::NoTilesSelected);
        }

        let normalized: Vec<PlacedTile> = pending.iter().cloned().map(PlacedTile::normalized).collect();
        super::board::words::check_placement(&normalized, &self.board)?;

        let rack = &self.player(uid).ok_or(GameError::NotAParticipant)?.rack;
        let requested: Vec<Tile> = normalized.iter().map(PlacedTile::tile).collect();
        let (remaining_rack, taken) = rack.remove(&requested)?;

        // Scores come from the rack, not from what the client claims.
        let placed: Vec<PlacedTile> = normalized
            .into_iter()
            .zip(taken)
            .map(|(mut placed, owned)| {
                placed.is_blank = owned.is_blank_tile();
                placed.score = owned.value();
                placed
            })
            .collect();

        let words = words_formed(&placed, &self.board)?;
        if words.is_empty() {
            return Err(GameError::InvalidPlacement(
                "tiles must form a word of at least two letters".to_string(),
            ));
        }

        Ok(PreparedPlay {
            uid: uid.to_string(),
            placed,
            words,
            remaining_rack,
        })
    }

    /// Applies a validated play: board, score, refill, then either the end of
    /// the game or the opponent's turn.
    pub fn commit_play(&self, prepared: PreparedPlay, scorer: &Scorer) -> Transition {
        let PreparedPlay {
            uid,
            placed,
            words,
            remaining_rack,
        } = prepared;

        let score = scorer.score_words(&words, &placed);
        let mut next = self.clone();
        next.board = self.board.merge(&placed);

        let (drawn, bag) = self.tile_bag.clone().draw(placed.len());
        next.tile_bag = bag;
        next.consecutive_passes = 0;

        let mut went_out = false;
        if let Some(data) = next.player_data.get_mut(&uid) {
            data.rack = remaining_rack.refill(drawn);
            data.score += score as i32;
            went_out = data.rack.is_empty();
        }

        if went_out && next.tile_bag.is_empty() {
            next.finish_with_empty_rack(&uid);
            info!(player = %uid, winner = ?next.winner, "Game finished on an empty rack");
        } else {
            next.hand_turn_to_opponent(&uid);
        }

        Transition {
            session: next,
            outcome: TurnOutcome::Played {
                score,
                words: words.into_iter().map(|w| w.word).collect(),
                tiles_placed: placed.len(),
            },
        }
    }

    pub fn pass(&self, uid: &str) -> Result<Transition, GameError> {
        self.ensure_can_act(uid)?;

        let mut next = self.clone();
        next.consecutive_passes += 1;
        next.hand_turn_to_opponent(uid);
        if next.consecutive_passes >= 2 {
            next.finish();
            info!(winner = ?next.winner, "Game finished after consecutive passes");
        }

        Ok(Transition {
            outcome: TurnOutcome::Passed {
                consecutive_passes: next.consecutive_passes,
            },
            session: next,
        })
    }

    pub fn exchange(&self, uid: &str, tiles: &[Tile]) -> Result<Transition, GameError> {
        self.exchange_with_rng(uid, tiles, &mut rand::thread_rng())
    }

    /// Swaps rack tiles for the same number from the bag. The returned tiles go
    /// back in only after the draw, so a player never draws their own tiles back.
    pub fn exchange_with_rng<R: Rng>(&self, uid: &str, tiles: &[Tile], rng: &mut R) -> Result<Transition, GameError> {
        self.ensure_can_act(uid)?;
        if tiles.is_empty() {
            return Err(GameError::NoTilesSelected);
        }
        if self.tile_bag.len() < RACK_SIZE {
            return Err(GameError::BagTooSmall {
                remaining: self.tile_bag.len(),
            });
        }

        let rack = &self.player(uid).ok_or(GameError::NotAParticipant)?.rack;
        let (remaining, returned) = rack.remove(tiles)?;
        let count = returned.len();

        let (drawn, bag) = self.tile_bag.clone().draw(count);
        let mut next = self.clone();
        next.tile_bag = bag.return_and_reshuffle_with_rng(returned, rng);
        if let Some(data) = next.player_data.get_mut(uid) {
            data.rack = remaining.refill(drawn);
        }
        next.consecutive_passes = 0;
        next.hand_turn_to_opponent(uid);

        Ok(Transition {
            session: next,
            outcome: TurnOutcome::Exchanged { count },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub player_id: String,
    pub difficulty: Difficulty,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            player_id: DEFAULT_BOT_ID.to_string(),
            difficulty: Difficulty::default(),
        }
    }
}

/// Runs turns that need the word service. Sessions go in by reference and
/// come back as new values; a refused turn leaves the input untouched.
#[derive(Clone)]
pub struct TurnEngine {
    oracle: Arc<dyn WordOracle>,
    scorer: Scorer,
    bot: BotSettings,
}

impl TurnEngine {
    pub fn new(oracle: Arc<dyn WordOracle>, bot: BotSettings) -> Self {
        Self {
            oracle,
            scorer: Scorer::new(),
            bot,
        }
    }

    pub fn bot(&self) -> &BotSettings {
        &self.bot
    }

    pub async fn play(&self, session: &GameSession, uid: &str, pending: &[PlacedTile]) -> Result<Transition, GameError> {
        let prepared = session.prepare_play(uid, pending)?;

        for word in prepared.words() {
            let verdict = self.oracle.validate_word(&word.word).await.map_err(|e| {
                warn!(word = %word.word, "Word validation failed: {}", e);
                GameError::Oracle(e.to_string())
            })?;
            if !verdict.is_valid {
                debug!(word = %word.word, reason = %verdict.reason, "Word rejected");
                return Err(GameError::InvalidWord {
                    word: word.word.clone(),
                    reason: verdict.reason,
                });
            }
        }

        let transition = session.commit_play(prepared, &self.scorer);
        info!(player = %uid, outcome = ?transition.outcome, "Play committed");
        Ok(transition)
    }

    pub fn pass(&self, session: &GameSession, uid: &str) -> Result<Transition, GameError> {
        session.pass(uid)
    }

    pub fn exchange(&self, session: &GameSession, uid: &str, tiles: &[Tile]) -> Result<Transition, GameError> {
        session.exchange(uid, tiles)
    }

    /// Asks the word service for a move on the bot's behalf. Anything short of a
    /// legal play turns into a pass so the human always gets the turn back.
    pub async fn bot_move(&self, session: &GameSession, difficulty: Option<Difficulty>) -> Result<Transition, GameError> {
        let bot_id = self.bot.player_id.as_str();
        if session.current_turn != bot_id {
            return Err(GameError::NotYourTurn);
        }
        if !session.is_active() {
            return Err(GameError::GameNotActive);
        }
        let rack = session.player(bot_id).ok_or(GameError::NotAParticipant)?.rack.clone();

        let board_state = session
            .board
            .to_json()
            .map_err(|e| GameError::Oracle(e.to_string()))?;
        let difficulty = difficulty.unwrap_or(self.bot.difficulty);

        let proposal = match self
            .oracle
            .generate_bot_move(&rack.letters(), &board_state, difficulty)
            .await
        {
            Ok(Some(proposal)) => proposal,
            Ok(None) => return self.bot_pass(session, "no move found".to_string()),
            Err(e) => {
                warn!("Bot move generation failed: {}", e);
                return self.bot_pass(session, format!("bot service failed: {}", e));
            }
        };

        let placed = match decode_bot_move(&proposal, &rack, &session.board) {
            Ok(placed) => placed,
            Err(reason) => return self.bot_pass(session, reason),
        };

        match self.play(session, bot_id, &placed).await {
            Ok(transition) => Ok(transition),
            Err(err) => self.bot_pass(session, err.to_string()),
        }
    }

    fn bot_pass(&self, session: &GameSession, reason: String) -> Result<Transition, GameError> {
        info!(bot = %self.bot.player_id, %reason, "Bot passes");
        let mut transition = session.pass(&self.bot.player_id)?;
        transition.outcome = TurnOutcome::BotPassed { reason };
        Ok(transition)
    }

    /// Word ideas for the player's rack. Marks the hint as used.
    pub async fn hint(&self, session: &GameSession, uid: &str) -> Result<Transition, GameError> {
        let rack = &session.player(uid).ok_or(GameError::NotAParticipant)?.rack;
        let board_state = session
            .board
            .to_json()
            .map_err(|e| GameError::Oracle(e.to_string()))?;

        let suggestions = self
            .oracle
            .suggest_words(&rack.letters(), &board_state)
            .await
            .map_err(|e| GameError::Oracle(e.to_string()))?;

        let mut next = session.clone();
        if let Some(data) = next.player_data.get_mut(uid) {
            data.hint_used = true;
        }

        Ok(Transition {
            session: next,
            outcome: TurnOutcome::Hint { suggestions },
        })
    }
}
