use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{Repository, StoredGame};
use crate::game::{GameError, GameSession, PlacedTile, Tile, TileBag, Transition, TurnEngine, TurnOutcome};
use crate::oracle::Difficulty;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Game not found.")]
    NotFound,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("The game changed while your move was being applied. Please try again.")]
    Conflict,
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// A turn request, replayed against a fresh read whenever the write loses a race.
#[derive(Debug, Clone)]
pub enum Action {
    Play { player_id: String, pending: Vec<PlacedTile> },
    Pass { player_id: String },
    Exchange { player_id: String, tiles: Vec<Tile> },
    BotMove { difficulty: Option<Difficulty> },
    Hint { player_id: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub id: String,
    pub version: i64,
    pub outcome: TurnOutcome,
    pub game: GameSession,
}

#[derive(Clone)]
pub struct GameService {
    repository: Arc<dyn Repository>,
    engine: TurnEngine,
    max_attempts: usize,
}

impl GameService {
    pub fn new(repository: Arc<dyn Repository>, engine: TurnEngine, max_attempts: usize) -> Self {
        Self {
            repository,
            engine,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn create_game(&self, first: &str, second: &str, seed: Option<&str>) -> Result<StoredGame, ServiceError> {
        let bag = match seed {
            Some(seed) => TileBag::from_seed(seed),
            None => TileBag::create(),
        };
        let session = GameSession::start(first, second, bag)?;
        let stored = self.repository.create_game(&session).await?;
        info!(game_id = %stored.id, %first, %second, "Created game");
        Ok(stored)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<StoredGame, ServiceError> {
        self.repository
            .get_game(game_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Read, transition, then write only if nobody else wrote in between.
    /// Rule errors come straight back; only lost races are retried.
    pub async fn apply(&self, game_id: &str, action: Action) -> Result<ActionResult, ServiceError> {
        for attempt in 1..=self.max_attempts {
            let stored = self.get_game(game_id).await?;
            let Transition { session, outcome } = self.transition(&stored.game, &action).await?;

            if self
                .repository
                .update_game(game_id, stored.version, &session)
                .await?
            {
                debug!(%game_id, version = stored.version + 1, ?outcome, "Committed turn");
                return Ok(ActionResult {
                    id: stored.id,
                    version: stored.version + 1,
                    outcome,
                    game: session,
                });
            }

            warn!(%game_id, attempt, "Version conflict while committing turn");
        }

        Err(ServiceError::Conflict)
    }

    async fn transition(&self, session: &GameSession, action: &Action) -> Result<Transition, GameError> {
        match action {
            Action::Play { player_id, pending } => self.engine.play(session, player_id, pending).await,
            Action::Pass { player_id } => self.engine.pass(session, player_id),
            Action::Exchange { player_id, tiles } => self.engine.exchange(session, player_id, tiles),
            Action::BotMove { difficulty } => self.engine.bot_move(session, *difficulty).await,
            Action::Hint { player_id } => self.engine.hint(session, player_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BotSettings;
    use crate::test_utils::{fixed_session, InMemoryRepository, StubOracle};

    fn service(repository: Arc<InMemoryRepository>) -> GameService {
        let engine = TurnEngine::new(Arc::new(StubOracle::accepting_all()), BotSettings::default());
        GameService::new(repository, engine, 3)
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let service = service(Arc::new(InMemoryRepository::default()));
        let created = service.create_game("alice", "bob", Some("seed")).await.unwrap();

        let fetched = service.get_game(&created.id).await.unwrap();
        assert_eq!(fetched.game, created.game);
        assert_eq!(fetched.game.current_turn, "alice");

        let again = service.create_game("alice", "bob", Some("seed")).await.unwrap();
        assert_eq!(again.game.tile_bag, created.game.tile_bag, "Same seed, same bag");

        assert!(matches!(
            service.create_game("alice", "alice", None).await,
            Err(ServiceError::Game(GameError::InvalidPlayers))
        ));
        assert!(matches!(service.get_game("nope").await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_pass_bumps_version() {
        let repository = Arc::new(InMemoryRepository::default());
        let service = service(repository.clone());
        let stored = repository.insert(fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ")).await;

        let result = service
            .apply(&stored.id, Action::Pass { player_id: "alice".to_string() })
            .await
            .unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(result.game.current_turn, "bob");
        assert_eq!(service.get_game(&stored.id).await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_retries_after_lost_race() {
        let repository = Arc::new(InMemoryRepository::with_conflicts(2));
        let service = service(repository.clone());
        let stored = repository.insert(fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ")).await;

        let result = service
            .apply(&stored.id, Action::Pass { player_id: "alice".to_string() })
            .await
            .unwrap();
        assert_eq!(result.game.consecutive_passes, 1);
        assert_eq!(repository.update_attempts(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_conflict() {
        let repository = Arc::new(InMemoryRepository::with_conflicts(10));
        let service = service(repository.clone());
        let stored = repository.insert(fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ")).await;

        let result = service
            .apply(&stored.id, Action::Pass { player_id: "alice".to_string() })
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict)));
        assert_eq!(service.get_game(&stored.id).await.unwrap().version, 0);
    }

    #[tokio::test]
    async fn test_rule_errors_are_not_retried() {
        let repository = Arc::new(InMemoryRepository::default());
        let service = service(repository.clone());
        let stored = repository.insert(fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ")).await;

        let result = service
            .apply(&stored.id, Action::Pass { player_id: "bob".to_string() })
            .await;
        assert!(matches!(result, Err(ServiceError::Game(GameError::NotYourTurn))));
        assert_eq!(repository.update_attempts(), 0);
    }

    #[tokio::test]
    async fn test_stale_version_never_overwrites() {
        let repository = Arc::new(InMemoryRepository::default());
        let stored = repository.insert(fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ")).await;

        let first = stored.game.pass("alice").unwrap().session;
        let rival = stored.game.exchange("alice", &[Tile::new('C', 3)]).unwrap().session;

        assert!(repository.update_game(&stored.id, 0, &first).await.unwrap());
        assert!(!repository.update_game(&stored.id, 0, &rival).await.unwrap());
        assert_eq!(repository.get_game(&stored.id).await.unwrap().unwrap().game, first);
    }
}
