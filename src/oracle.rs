//! Reasoning oracle adapter
//!
//! Wraps the external natural-language-understanding service that proposes
//! pun candidates for a sentence. The oracle is a non-deterministic,
//! partially-trusted collaborator: it sits behind the [`PunOracle`] trait so
//! tests can swap in a deterministic stub, and everything it returns is
//! treated as untrusted until the engine coerces it into the typed model.
//!
//! The adapter makes exactly one outbound call per invocation and keeps no
//! state between calls. Retry policy belongs to the engine, not here.

use crate::config::EngineConfig;
use crate::error::{PieError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Anthropic Messages API endpoint
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Instruction template sent with every sentence
const PUN_ANALYSIS_PROMPT: &str = r#"You are a linguistic expert specializing in pun identification and analysis.

Your task is to analyze a sentence and identify any puns it contains. For each pun found, provide:

1. The word or expression that creates the pun
2. The type of pun:
   - homophonic: similar-sounding words (e.g., "prophet" / "profit")
   - homographic: same spelling, different meanings (e.g., "foot" as body part / unit of measurement)
   - recursive: self-referential or term-dependent (e.g., "Immanuel doesn't pun, he Kant")
   - antanaclasis: same word repeated with different senses (e.g., "hang together" / "hang separately")

3. The two senses/meanings being played upon
4. FrameNet frames that best capture each sense (use standard FrameNet frame names if you know them)
5. An explanation of how the pun works

Respond in this exact JSON format:
{
  "has_pun": true or false,
  "puns": [
    {
      "word_or_expression": "the pun word/phrase",
      "pun_type": "homophonic|homographic|recursive|antanaclasis",
      "sense1": "first meaning",
      "sense2": "second meaning",
      "sense1_frame": "FrameNet frame name for sense 1",
      "sense2_frame": "FrameNet frame name for sense 2",
      "explanation": "explanation of how the pun works"
    }
  ],
  "analysis_notes": "any additional observations"
}

Be thorough but precise. Only identify genuine puns where multiple meanings are simultaneously activated.
If there is no pun, return {"has_pun": false, "puns": [], "analysis_notes": "explanation of why no pun"}"#;

/// An untrusted candidate record straight off the wire
///
/// Field values are whatever the oracle produced; the engine coerces these
/// into [`crate::types::PunCandidate`]s, rejecting anything malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPunRecord {
    #[serde(default)]
    pub word_or_expression: String,

    #[serde(default)]
    pub pun_type: String,

    #[serde(default)]
    pub sense1: String,

    #[serde(default)]
    pub sense2: String,

    #[serde(default)]
    pub sense1_frame: Option<String>,

    #[serde(default)]
    pub sense2_frame: Option<String>,

    #[serde(default)]
    pub explanation: String,
}

/// Parsed oracle response for one sentence
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OracleAnalysis {
    #[serde(default)]
    pub puns: Vec<RawPunRecord>,

    #[serde(default)]
    pub analysis_notes: String,
}

/// Single-capability interface to the reasoning oracle
#[async_trait]
pub trait PunOracle: Send + Sync {
    /// Propose pun candidates for a sentence.
    ///
    /// Fails with [`PieError::OracleUnavailable`] on transport/auth trouble
    /// and [`PieError::OracleMalformedResponse`] when the payload cannot be
    /// parsed into the expected shape. Never retries internally.
    async fn propose(&self, sentence: &str) -> Result<OracleAnalysis>;

    /// Model identifier, for status reporting.
    fn model(&self) -> &str;
}

/// Anthropic Messages API wire structs
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: usize,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    text: String,
}

/// Oracle adapter backed by the Anthropic Messages API
pub struct AnthropicOracle {
    config: EngineConfig,
    client: reqwest::Client,
}

impl AnthropicOracle {
    /// Create an adapter from configuration; the API key must be present.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.require_api_key()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(PieError::Http)?;

        Ok(Self { config, client })
    }

    async fn call_api(&self, sentence: &str) -> Result<String> {
        debug!("Calling Anthropic API for pun analysis");

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: PUN_ANALYSIS_PROMPT.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("Analyze this sentence for puns:\n\n\"{}\"", sentence),
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PieError::OracleUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PieError::OracleUnavailable(
                    format!("authentication rejected (status {})", status),
                ),
                StatusCode::TOO_MANY_REQUESTS => {
                    PieError::OracleUnavailable("rate limit exceeded".to_string())
                }
                s if s.is_server_error() => {
                    PieError::OracleUnavailable(format!("server error (status {})", s))
                }
                s => PieError::OracleMalformedResponse(format!(
                    "unexpected status {}: {}",
                    s, body
                )),
            });
        }

        let api_response: AnthropicResponse = response.json().await.map_err(|e| {
            PieError::OracleMalformedResponse(format!("failed to parse response envelope: {}", e))
        })?;

        api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| PieError::OracleMalformedResponse("empty response".to_string()))
    }
}

#[async_trait]
impl PunOracle for AnthropicOracle {
    async fn propose(&self, sentence: &str) -> Result<OracleAnalysis> {
        let text = self.call_api(sentence).await?;
        parse_oracle_payload(&text)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Extract and parse the JSON analysis from the oracle's text response.
///
/// The model sometimes wraps the object in prose, so after a direct parse
/// fails we retry on the span from the first `{` to the last `}`.
pub fn parse_oracle_payload(text: &str) -> Result<OracleAnalysis> {
    if let Ok(analysis) = serde_json::from_str::<OracleAnalysis>(text) {
        return Ok(analysis);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(analysis) = serde_json::from_str::<OracleAnalysis>(&text[start..=end]) {
                return Ok(analysis);
            }
        }
    }

    warn!(
        "Oracle response was not parseable JSON: {}...",
        text.chars().take(120).collect::<String>()
    );
    Err(PieError::OracleMalformedResponse(
        "no JSON analysis object found in response".to_string(),
    ))
}
