//! Shared test support: a deterministic scripted oracle and config helpers
#![allow(dead_code)]

use async_trait::async_trait;
use pie_core::{EngineConfig, OracleAnalysis, PieError, PunOracle, RawPunRecord, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Scripted stand-in for the reasoning oracle.
///
/// Responds per-sentence from a fixed table, optionally failing the first
/// N calls or delaying, so engine retry/degradation/deadline policy can be
/// exercised without a network.
pub struct StubOracle {
    responses: HashMap<String, OracleAnalysis>,
    unavailable_failures: u32,
    always_malformed: bool,
    delay: Option<Duration>,
    pub calls: AtomicU32,
}

impl StubOracle {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            unavailable_failures: 0,
            always_malformed: false,
            delay: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Script a response for a specific sentence.
    pub fn respond(mut self, sentence: &str, analysis: OracleAnalysis) -> Self {
        self.responses.insert(sentence.trim().to_string(), analysis);
        self
    }

    /// Fail with `OracleUnavailable` for the first `times` calls
    /// (`u32::MAX` to fail forever).
    pub fn fail_unavailable(mut self, times: u32) -> Self {
        self.unavailable_failures = times;
        self
    }

    /// Fail every call with `OracleMalformedResponse`.
    pub fn fail_malformed(mut self) -> Self {
        self.always_malformed = true;
        self
    }

    /// Sleep before responding, to exercise deadlines.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PunOracle for StubOracle {
    async fn propose(&self, sentence: &str) -> Result<OracleAnalysis> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.always_malformed {
            return Err(PieError::OracleMalformedResponse(
                "scripted malformed response".to_string(),
            ));
        }
        if call < self.unavailable_failures {
            return Err(PieError::OracleUnavailable("scripted outage".to_string()));
        }

        Ok(self
            .responses
            .get(sentence.trim())
            .cloned()
            .unwrap_or_else(|| OracleAnalysis {
                puns: vec![],
                analysis_notes: "No pun found in this sentence.".to_string(),
            }))
    }

    fn model(&self) -> &str {
        "scripted-stub"
    }
}

/// Engine config tuned for tests: no real credentials, near-zero backoff.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        api_key: "sk-ant-test".to_string(),
        backoff_base_ms: 1,
        ..Default::default()
    }
}

pub const BANKER_SENTENCE: &str = "I used to be a banker, but I lost interest.";
pub const WEATHER_SENTENCE: &str = "The weather is nice today.";

/// The canonical "interest" candidate an oracle would propose for
/// [`BANKER_SENTENCE`].
pub fn interest_record() -> RawPunRecord {
    record(
        "interest",
        "homographic",
        "curiosity",
        "money paid on a loan",
        Some("Emotion_directed"),
        Some("Commerce_pay"),
    )
}

pub fn record(
    word: &str,
    pun_type: &str,
    sense1: &str,
    sense2: &str,
    frame1: Option<&str>,
    frame2: Option<&str>,
) -> RawPunRecord {
    RawPunRecord {
        word_or_expression: word.to_string(),
        pun_type: pun_type.to_string(),
        sense1: sense1.to_string(),
        sense2: sense2.to_string(),
        sense1_frame: frame1.map(String::from),
        sense2_frame: frame2.map(String::from),
        explanation: format!("Plays on two senses of '{}'", word),
    }
}

pub fn analysis(puns: Vec<RawPunRecord>, notes: &str) -> OracleAnalysis {
    OracleAnalysis {
        puns,
        analysis_notes: notes.to_string(),
    }
}
