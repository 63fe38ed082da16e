use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;

use wordclash::config::ServerConfig;
use wordclash::db::setup_database;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();

    info!("Running migrations against {}", config.database_url);
    setup_database(&config.database_url).await?;
    info!("Database is up to date");

    Ok(())
}
