use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_NEWS_SOURCE_URL: &str = "https://auto.economictimes.indiatimes.com/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read from the environment exactly once at startup
/// and handed to the collaborators. Nothing below the handlers touches the
/// environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub firebase_db_url: String,
    pub google_api_key: String,
    pub port: u16,
    pub upstream_timeout: Duration,
    pub news_source_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let firebase_db_url = require("FIREBASE_DB_URL")?
            .trim_end_matches('/')
            .to_string();
        let google_api_key = require("GOOGLE_API_KEY")?;
        let port = parse_or("PORT", DEFAULT_PORT)?;
        let timeout_secs = parse_or("UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?;
        let news_source_url =
            std::env::var("NEWS_SOURCE_URL").unwrap_or_else(|_| DEFAULT_NEWS_SOURCE_URL.to_string());

        Ok(Self {
            firebase_db_url,
            google_api_key,
            port,
            upstream_timeout: Duration::from_secs(timeout_secs),
            news_source_url,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}
