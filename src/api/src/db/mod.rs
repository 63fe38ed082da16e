pub mod models;
pub mod repository;
pub mod repository_sqlite;

pub use models::{DbGame, StoredGame};
pub use repository::Repository;
pub use repository_sqlite::SqliteRepository;

use anyhow::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub async fn setup_database(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    if !in_memory && !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        tracing::info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    }

    // Every connection to an in-memory database sees its own empty database
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?
    } else {
        SqlitePool::connect(database_url).await?
    };

    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT UNIQUE NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    )
    .execute(pool)
    .await?;

    let migrations = [(
        "001_initial.sql",
        include_str!("../../migrations/sqlite/001_initial.sql"),
    )];

    for (filename, migration_sql) in &migrations {
        let applied = sqlx::query("SELECT filename FROM migrations WHERE filename = ?")
            .bind(filename)
            .fetch_optional(pool)
            .await?;

        if applied.is_some() {
            tracing::info!("Migration {} already applied, skipping", filename);
            continue;
        }

        tracing::info!("Running migration: {}", filename);

        for statement in migration_sql.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                sqlx::query(statement).execute(pool).await?;
            }
        }

        sqlx::query("INSERT INTO migrations (filename) VALUES (?)")
            .bind(filename)
            .execute(pool)
            .await?;

        tracing::info!("Migration {} completed successfully", filename);
    }

    tracing::info!("SQLite database migrations completed");
    Ok(())
}
