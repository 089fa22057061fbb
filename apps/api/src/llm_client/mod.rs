/// LLM client: the single point of entry for all model calls in the ranker.
///
/// ARCHITECTURAL RULE: extraction and scoring only ever see `dyn LlmBackend`.
/// Which provider sits behind it is decided once, at startup, by `build_backend`.
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::{LlmConfig, LlmProvider};

pub mod gemini;
pub mod ollama;
pub mod prompts;

pub use gemini::GeminiBackend;
pub use ollama::OllamaBackend;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Network failure, timeout, or an unreadable response body.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON whose shape does not match the expected record.
    #[error("Unexpected response shape: {0}")]
    Schema(String),
}

/// A text-completion capability. Implement this to add a provider without
/// touching the extractor, scorer, or pipeline.
///
/// Carried in the pipeline as `Arc<dyn LlmBackend>`.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Short provider label for logs ("gemini", "ollama").
    fn name(&self) -> &'static str;

    /// Sends one prompt and returns the raw completion text. No retries.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Builds the backend selected by configuration.
pub fn build_backend(config: &LlmConfig) -> Arc<dyn LlmBackend> {
    match &config.provider {
        LlmProvider::Gemini { api_key, model } => Arc::new(GeminiBackend::new(
            api_key.clone(),
            model.clone(),
            config.timeout,
        )),
        LlmProvider::Ollama { base_url, model } => Arc::new(OllamaBackend::new(
            base_url.clone(),
            model.clone(),
            config.timeout,
        )),
    }
}

/// Calls the backend and deserializes the completion as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn generate_json<T: DeserializeOwned>(
    llm: &dyn LlmBackend,
    prompt: &str,
) -> Result<T, LlmError> {
    let raw = llm.generate(prompt).await?;
    debug!("{} returned {} chars", llm.name(), raw.len());
    parse_json(&raw)
}

/// Strips optional code fences and parses the remaining text.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let body = body.trim_start();
    body.strip_suffix("```").unwrap_or(body).trim()
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_leading_only() {
        let input = "```json\n{\"key\": 1}";
        assert_eq!(strip_json_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let bare = r#"{"degree": ["BSc Computer Science"], "office": 1}"#;
        let fenced = format!("```json\n{bare}\n```");
        let a: Value = parse_json(bare).unwrap();
        let b: Value = parse_json(&fenced).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_json_empty_is_empty_content() {
        let err = parse_json::<Value>("```json\n```").unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[test]
    fn test_parse_json_garbage_is_parse_error() {
        let err = parse_json::<Value>("Sure! Here is the JSON you asked for").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_build_backend_selects_provider() {
        let gemini = build_backend(&LlmConfig {
            provider: LlmProvider::Gemini {
                api_key: "key".to_string(),
                model: "gemini-1.5-flash".to_string(),
            },
            timeout: std::time::Duration::from_secs(5),
        });
        assert_eq!(gemini.name(), "gemini");

        let ollama = build_backend(&LlmConfig {
            provider: LlmProvider::Ollama {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.1".to_string(),
            },
            timeout: std::time::Duration::from_secs(5),
        });
        assert_eq!(ollama.name(), "ollama");
    }
}
