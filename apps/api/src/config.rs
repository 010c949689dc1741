use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{RetryPolicy, DEFAULT_MODEL};
use crate::recruiting::ranking::RankingLimits;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Oracle calls fail fast with a missing-key error when unset.
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub retry: RetryPolicy,
    pub ranking: RankingLimits,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = RankingLimits::default();
        let retry_defaults = RetryPolicy::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            database_url: var("DATABASE_URL").with_context(|| {
                "Required environment variable 'DATABASE_URL' is not set".to_string()
            })?,
            groq_api_key: var("GROQ_API_KEY"),
            groq_model: var("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            retry: RetryPolicy {
                max_attempts: parse_or(
                    var("ORACLE_MAX_ATTEMPTS"),
                    "ORACLE_MAX_ATTEMPTS",
                    retry_defaults.max_attempts,
                )?
                .max(1),
                delay: Duration::from_millis(parse_or(
                    var("ORACLE_RETRY_DELAY_MS"),
                    "ORACLE_RETRY_DELAY_MS",
                    retry_defaults.delay.as_millis() as u64,
                )?),
            },
            ranking: RankingLimits {
                default: parse_or(
                    var("RANKING_DEFAULT_LIMIT"),
                    "RANKING_DEFAULT_LIMIT",
                    defaults.default,
                )?,
                creation: parse_or(
                    var("RANKING_CREATION_LIMIT"),
                    "RANKING_CREATION_LIMIT",
                    defaults.creation,
                )?,
                summary: parse_or(
                    var("RANKING_SUMMARY_LIMIT"),
                    "RANKING_SUMMARY_LIMIT",
                    defaults.summary,
                )?,
            },
            port: parse_or(var("PORT"), "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
