use anyhow::Result;
use axum::async_trait;

use super::models::StoredGame;
use crate::game::GameSession;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn create_game(&self, session: &GameSession) -> Result<StoredGame>;

    async fn get_game(&self, game_id: &str) -> Result<Option<StoredGame>>;

    /// Writes `session` only if the stored version still equals `expected_version`,
    /// bumping the version. Returns false when someone else wrote first.
    async fn update_game(&self, game_id: &str, expected_version: i64, session: &GameSession) -> Result<bool>;
}
