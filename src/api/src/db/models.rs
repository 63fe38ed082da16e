use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::game::GameSession;

/// One row of the `games` table. `document` is the JSON game session.
#[derive(Debug, Clone)]
pub struct DbGame {
    pub id: String,
    pub document: String,
    pub version: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbGame {
    pub fn new(session: &GameSession) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            document: session.to_json()?,
            version: 0,
            status: session.status.as_str().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn decode(&self) -> Result<StoredGame> {
        Ok(StoredGame {
            id: self.id.clone(),
            version: self.version,
            game: GameSession::from_json(&self.document)?,
        })
    }
}

/// A game as the service sees it: the decoded session plus the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredGame {
    pub id: String,
    pub version: i64,
    pub game: GameSession,
}
