use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use axum::async_trait;
use axum::Router;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::db::{Repository, StoredGame};
use crate::game::bag::points_for_letter;
use crate::game::tile::BLANK_LETTER;
use crate::game::{BotSettings, GameSession, Rack, Tile, TileBag, TurnEngine};
use crate::http_api::{create_router, ApiState};
use crate::oracle::{BotMove, Difficulty, WordOracle, WordVerdict};
use crate::service::GameService;

/// Tiles with their standard values; a space is a blank.
pub fn tiles(letters: &str) -> Vec<Tile> {
    letters
        .chars()
        .map(|c| {
            if c == BLANK_LETTER {
                Tile::blank()
            } else {
                Tile::new(c, points_for_letter(c))
            }
        })
        .collect()
}

/// "alice" against "bob" with known racks and bag. Alice moves first and the
/// last letter of `bag` is drawn first.
pub fn fixed_session(alice: &str, bob: &str, bag: &str) -> GameSession {
    let mut session = GameSession::start("alice", "bob", TileBag::default()).unwrap();
    session.player_data.get_mut("alice").unwrap().rack = Rack::new(tiles(alice));
    session.player_data.get_mut("bob").unwrap().rack = Rack::new(tiles(bob));
    session.tile_bag = TileBag::from_tiles(tiles(bag));
    session
}

/// Deterministic word service. Accepts every word unless told otherwise.
#[derive(Default)]
pub struct StubOracle {
    rejected: HashSet<String>,
    down: bool,
    suggestions: Vec<String>,
    bot_move: Option<BotMove>,
    validated: Mutex<Vec<String>>,
}

impl StubOracle {
    pub fn accepting_all() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            down: true,
            ..Default::default()
        }
    }

    pub fn rejecting(mut self, words: &[&str]) -> Self {
        self.rejected.extend(words.iter().map(|w| w.to_ascii_uppercase()));
        self
    }

    pub fn with_suggestions(mut self, words: &[&str]) -> Self {
        self.suggestions = words.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn with_bot_move(mut self, proposal: BotMove) -> Self {
        self.bot_move = Some(proposal);
        self
    }

    pub fn validated_words(&self) -> Vec<String> {
        self.validated.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordOracle for StubOracle {
    async fn validate_word(&self, word: &str) -> Result<WordVerdict> {
        if self.down {
            bail!("stub oracle is down");
        }
        self.validated.lock().unwrap().push(word.to_string());
        if self.rejected.contains(&word.to_ascii_uppercase()) {
            Ok(WordVerdict::invalid("not in the stub dictionary"))
        } else {
            Ok(WordVerdict::valid("ok"))
        }
    }

    async fn suggest_words(&self, _tiles: &str, _board_state: &str) -> Result<Vec<String>> {
        if self.down {
            bail!("stub oracle is down");
        }
        Ok(self.suggestions.clone())
    }

    async fn generate_bot_move(
        &self,
        _tiles: &str,
        _board_state: &str,
        _difficulty: Difficulty,
    ) -> Result<Option<BotMove>> {
        if self.down {
            bail!("stub oracle is down");
        }
        Ok(self.bot_move.clone())
    }
}

/// Map-backed repository. `with_conflicts(n)` makes the next `n` writes lose
/// their race, as if another request had committed first.
#[derive(Default)]
pub struct InMemoryRepository {
    games: tokio::sync::Mutex<HashMap<String, StoredGame>>,
    conflicts: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryRepository {
    pub fn with_conflicts(conflicts: usize) -> Self {
        Self {
            conflicts: AtomicUsize::new(conflicts),
            ..Default::default()
        }
    }

    pub async fn insert(&self, session: GameSession) -> StoredGame {
        self.create_game(&session).await.unwrap()
    }

    pub fn update_attempts(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_game(&self, session: &GameSession) -> Result<StoredGame> {
        let stored = StoredGame {
            id: Uuid::new_v4().to_string(),
            version: 0,
            game: session.clone(),
        };
        self.games.lock().await.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<StoredGame>> {
        Ok(self.games.lock().await.get(game_id).cloned())
    }

    async fn update_game(&self, game_id: &str, expected_version: i64, session: &GameSession) -> Result<bool> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let lost_race = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if lost_race {
            return Ok(false);
        }

        let mut games = self.games.lock().await;
        match games.get_mut(game_id) {
            Some(stored) if stored.version == expected_version => {
                stored.game = session.clone();
                stored.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Router over an in-memory repository, plus the repository for seeding.
pub fn setup_app(oracle: StubOracle) -> (Arc<InMemoryRepository>, Router) {
    let repository = Arc::new(InMemoryRepository::default());
    let config = ServerConfig::default();
    let engine = TurnEngine::new(Arc::new(oracle), BotSettings::default());
    let service = GameService::new(repository.clone(), engine, config.max_commit_retries);
    let app = create_router(ApiState::new(service), &config);
    (repository, app)
}
