use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;

use wordclash::config::ServerConfig;
use wordclash::db::{setup_database, SqliteRepository};
use wordclash::game::TurnEngine;
use wordclash::http_api::{self, ApiState};
use wordclash::oracle::DictionaryOracle;
use wordclash::service::GameService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting wordclash server");

    let config = ServerConfig::from_env();

    info!("Setting up database connection");
    let pool = setup_database(&config.database_url).await?;
    let repository = Arc::new(SqliteRepository::new(pool));

    info!("Loading word list from {}", config.wordlist_path.display());
    let oracle = Arc::new(DictionaryOracle::from_file(&config.wordlist_path)?);

    let bot = config.bot_settings();
    info!("Bot plays as {} on {}", bot.player_id, bot.difficulty);
    let engine = TurnEngine::new(oracle, bot);
    let service = GameService::new(repository, engine, config.max_commit_retries);

    let http_router = http_api::create_router(ApiState::new(service), &config);
    let http_addr = config.http_addr();

    info!("Starting HTTP API server on {}", http_addr);
    axum::serve(tokio::net::TcpListener::bind(&http_addr).await?, http_router)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
