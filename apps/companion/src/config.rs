use anyhow::{bail, Context, Result};

use crate::keywords::MatchMode;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub keyword_match_mode: MatchMode,
    /// Total attempts per LLM call. 1 means a single attempt, no retry.
    pub llm_max_retries: u32,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let anthropic_api_key = require_env("ANTHROPIC_API_KEY")?;
        if anthropic_api_key.trim().is_empty() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is empty");
        }

        let llm_max_retries = parse_env("LLM_MAX_RETRIES", 1u32)?;
        if llm_max_retries == 0 {
            bail!("LLM_MAX_RETRIES must be at least 1");
        }

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://resumes.db".to_string()),
            anthropic_api_key,
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            keyword_match_mode: std::env::var("KEYWORD_MATCH_MODE")
                .unwrap_or_else(|_| "phrase".to_string())
                .parse::<MatchMode>()
                .context("KEYWORD_MATCH_MODE must be 'phrase' or 'word'")?,
            llm_max_retries,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120u64)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
