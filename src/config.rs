//! Configuration for the PIE analysis engine
//!
//! Credentials come from the environment (`ANTHROPIC_API_KEY`), never from
//! source or persisted state. Everything else is a plain tunable with a
//! documented default.

use crate::error::{PieError, Result};
use std::env;

/// Default confidence threshold below which candidates are dropped
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Default retry ceiling for transient oracle failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-call oracle timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default base duration for exponential retry backoff, in milliseconds
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

/// Default bound on concurrently analyzed sentences in a batch
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Configuration for the analysis engine and its oracle adapter
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Anthropic API key
    pub api_key: String,

    /// Model to use for pun analysis
    pub model: String,

    /// Max tokens for oracle responses
    pub max_tokens: usize,

    /// Sampling temperature for the oracle
    pub temperature: f32,

    /// Minimum combined confidence for a candidate to appear in results
    pub min_confidence: f64,

    /// Retry ceiling for transient oracle failures (attempts beyond the first)
    pub max_retries: u32,

    /// Base duration for exponential retry backoff, in milliseconds
    pub backoff_base_ms: u64,

    /// Per-call oracle timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum sentences analyzed concurrently by `analyze_batch`
    pub batch_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2000,
            temperature: 0.2,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl EngineConfig {
    /// Validate that the configuration can drive a live oracle.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(PieError::Config(config::ConfigError::Message(
                "ANTHROPIC_API_KEY not set".to_string(),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = EngineConfig {
            api_key: "sk-ant-test".to_string(),
            ..Default::default()
        };
        assert!(cfg.min_confidence > 0.0 && cfg.min_confidence < 1.0);
        assert!(cfg.max_retries >= 1);
        assert!(cfg.batch_concurrency >= 1);
        assert!(cfg.require_api_key().is_ok());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let cfg = EngineConfig {
            api_key: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.require_api_key(),
            Err(PieError::Config(_))
        ));
    }
}
