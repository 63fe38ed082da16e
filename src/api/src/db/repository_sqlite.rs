use anyhow::Result;
use axum::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::models::{DbGame, StoredGame};
use super::repository::Repository;
use crate::game::GameSession;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_game(row: &SqliteRow) -> DbGame {
        DbGame {
            id: row.get("id"),
            document: row.get("document"),
            version: row.get("version"),
            status: row.get("status"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn create_game(&self, session: &GameSession) -> Result<StoredGame> {
        let game = DbGame::new(session)?;

        sqlx::query(
            "INSERT INTO games (id, document, version, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&game.id)
        .bind(&game.document)
        .bind(game.version)
        .bind(&game.status)
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(StoredGame {
            id: game.id,
            version: game.version,
            game: session.clone(),
        })
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<StoredGame>> {
        let row = sqlx::query(
            "SELECT id, document, version, status, created_at, updated_at FROM games WHERE id = ?1",
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_game(&row).decode()?)),
            None => Ok(None),
        }
    }

    async fn update_game(&self, game_id: &str, expected_version: i64, session: &GameSession) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE games SET document = ?1, status = ?2, version = version + 1, updated_at = ?3 WHERE id = ?4 AND version = ?5",
        )
        .bind(session.to_json()?)
        .bind(session.status.as_str())
        .bind(Utc::now())
        .bind(game_id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
