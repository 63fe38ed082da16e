use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::game::turn::{BotSettings, DEFAULT_BOT_ID};
use crate::oracle::Difficulty;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub server_host: String,
    pub http_port: u16,
    pub wordlist_path: PathBuf,
    pub bot_player_id: String,
    pub bot_difficulty: Difficulty,
    pub max_commit_retries: usize,
    pub allowed_origins: Vec<String>,
    pub cors_max_age: Duration,
    pub request_timeout: Duration,
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://wordclash.db".to_string(),
            server_host: "127.0.0.1".to_string(),
            http_port: 3001,
            wordlist_path: PathBuf::from("wordlist"),
            bot_player_id: DEFAULT_BOT_ID.to_string(),
            bot_difficulty: Difficulty::Medium,
            max_commit_retries: 3,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            cors_max_age: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
            max_request_size: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }

        if let Ok(port) = env::var("HTTP_PORT") {
            match port.parse::<u16>() {
                Ok(value) => config.http_port = value,
                Err(_) => warn!("Ignoring invalid HTTP_PORT {:?}", port),
            }
        }

        if let Ok(path) = env::var("WORDLIST_PATH") {
            config.wordlist_path = PathBuf::from(path);
        }

        if let Ok(id) = env::var("BOT_PLAYER_ID") {
            if !id.trim().is_empty() {
                config.bot_player_id = id.trim().to_string();
            }
        }

        if let Ok(difficulty) = env::var("BOT_DIFFICULTY") {
            match difficulty.parse::<Difficulty>() {
                Ok(value) => config.bot_difficulty = value,
                Err(e) => warn!("Ignoring BOT_DIFFICULTY: {}", e),
            }
        }

        if let Ok(retries) = env::var("MAX_COMMIT_RETRIES") {
            if let Ok(value) = retries.parse::<usize>() {
                config.max_commit_retries = value.max(1);
            }
        }

        if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(max_age) = env::var("CORS_MAX_AGE") {
            if let Ok(seconds) = max_age.parse::<u64>() {
                config.cors_max_age = Duration::from_secs(seconds);
            }
        }

        if let Ok(timeout) = env::var("REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(size) = env::var("MAX_REQUEST_SIZE") {
            if let Ok(bytes) = size.parse::<usize>() {
                config.max_request_size = bytes;
            }
        }

        config
    }

    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            player_id: self.bot_player_id.clone(),
            difficulty: self.bot_difficulty,
        }
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), "127.0.0.1:3001");
        assert_eq!(config.bot_settings(), BotSettings::default());
        assert_eq!(config.max_commit_retries, 3);
    }

    // Single test touching the environment so parallel tests do not race on it
    #[test]
    fn test_from_env_overrides() {
        env::set_var("HTTP_PORT", "8080");
        env::set_var("BOT_DIFFICULTY", "hard");
        env::set_var("ALLOWED_ORIGINS", "https://a.example, https://b.example");
        env::set_var("MAX_COMMIT_RETRIES", "0");

        let config = ServerConfig::from_env();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.bot_difficulty, Difficulty::Hard);
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.max_commit_retries, 1);

        env::set_var("HTTP_PORT", "not-a-port");
        assert_eq!(ServerConfig::from_env().http_port, 3001);

        for key in ["HTTP_PORT", "BOT_DIFFICULTY", "ALLOWED_ORIGINS", "MAX_COMMIT_RETRIES"] {
            env::remove_var(key);
        }
    }
}
