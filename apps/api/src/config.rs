use anyhow::{ensure, Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::similarity::DEFAULT_PASS_THRESHOLD;

/// Application configuration loaded from environment variables.
/// Fails at startup if a present variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional at startup. Requests that need the model report a missing key to the user.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    /// Similarity at or above this value is a PASS.
    pub pass_threshold: f64,
    pub max_upload_bytes: usize,
    pub evaluation_capacity: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let pass_threshold = parse_env("PASS_THRESHOLD", DEFAULT_PASS_THRESHOLD)?;
        ensure!(
            (0.0..=1.0).contains(&pass_threshold),
            "PASS_THRESHOLD must be between 0.0 and 1.0, got {pass_threshold}"
        );

        let evaluation_capacity = parse_env("EVALUATION_CAPACITY", 256_usize)?;
        ensure!(evaluation_capacity > 0, "EVALUATION_CAPACITY must be at least 1");

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_timeout_secs: parse_env("OPENAI_TIMEOUT_SECS", 120_u64)?,
            host: optional_env("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_env("PORT", 7860_u16)?,
            pass_threshold,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024_usize)?,
            evaluation_capacity,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Defaults without touching the process environment.
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            openai_timeout_secs: 5,
            host: "127.0.0.1".to_string(),
            port: 0,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            max_upload_bytes: 1024 * 1024,
            evaluation_capacity: 8,
            rust_log: "debug".to_string(),
        }
    }
}

/// Reads a variable, treating blank values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
