use std::time::Duration;

use thiserror::Error;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MATCH_CONCURRENCY: usize = 4;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{key}' has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("Unknown LLM backend '{0}' (expected 'gemini' or 'ollama')")]
    UnknownBackend(String),
}

/// Which model provider sits behind the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmProvider {
    Gemini { api_key: String, model: String },
    Ollama { base_url: String, model: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing; the Gemini backend
/// refuses to start without an API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm: LlmConfig,
    pub match_concurrency: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = get("LLM_BACKEND").unwrap_or_else(|| "gemini".to_string());
        let provider = match backend.to_ascii_lowercase().as_str() {
            "gemini" => LlmProvider::Gemini {
                api_key: get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            "ollama" => LlmProvider::Ollama {
                base_url: get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            },
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        let timeout_secs: u64 = parse_or(
            get("LLM_TIMEOUT_SECS"),
            "LLM_TIMEOUT_SECS",
            DEFAULT_LLM_TIMEOUT_SECS,
        )?;
        let match_concurrency: usize = parse_or(
            get("MATCH_CONCURRENCY"),
            "MATCH_CONCURRENCY",
            DEFAULT_MATCH_CONCURRENCY,
        )?;

        Ok(Config {
            database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            llm: LlmConfig {
                provider,
                timeout: Duration::from_secs(timeout_secs),
            },
            match_concurrency: match_concurrency.max(1),
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            port: parse_or(get("PORT"), "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
