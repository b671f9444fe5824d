//! Analysis engine orchestrating the pun identification pipeline
//!
//! Per sentence: call the reasoning oracle (with bounded retry), coerce its
//! untrusted records into typed candidates, measure frame distance, run the
//! deterministic validators, blend a final confidence, then filter and rank.
//!
//! The engine absorbs collaborator failures: total oracle failure, deadline
//! expiry, or a lexicon-free environment all degrade to a well-formed
//! no-pun result with explanatory notes. The only error surfaced to a
//! caller of [`AnalysisEngine::analyze`] is `InvalidInput` for an empty
//! sentence.

use crate::config::EngineConfig;
use crate::error::{PieError, Result};
use crate::framenet::{FrameLexicon, FrameResolver};
use crate::oracle::{AnthropicOracle, OracleAnalysis, PunOracle, RawPunRecord};
use crate::types::{Pun, PunAnalysisResult, PunCandidate, PunType};
use crate::validator::PunValidator;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Cap on the frame-distance confidence bonus
const FRAME_BONUS_CAP: f64 = 0.2;

/// Confidence bonus per unit of frame distance
const FRAME_BONUS_PER_UNIT: f64 = 0.04;

/// Engine status snapshot for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    /// Oracle model identifier
    pub model: String,

    /// Provenance of the frame lexicon ("built-in" or a file path)
    pub lexicon_source: String,

    /// Number of frames available to the resolver
    pub lexicon_frames: usize,

    /// Active confidence threshold
    pub min_confidence: f64,
}

/// Orchestrator for the pun analysis pipeline
///
/// Cheap to clone: the oracle and lexicon are shared behind `Arc`s, and no
/// analysis mutates engine state.
#[derive(Clone)]
pub struct AnalysisEngine {
    oracle: Arc<dyn PunOracle>,
    resolver: FrameResolver,
    validator: PunValidator,
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create an engine backed by the live Anthropic oracle and the
    /// built-in frame lexicon.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let oracle = Arc::new(AnthropicOracle::new(config.clone())?);
        Ok(Self::with_oracle(oracle, config))
    }

    /// Create an engine over any oracle implementation (tests use stubs).
    pub fn with_oracle(oracle: Arc<dyn PunOracle>, config: EngineConfig) -> Self {
        Self::with_parts(oracle, FrameResolver::with_builtin(), config)
    }

    /// Create an engine with an explicit resolver, e.g. over a lexicon
    /// loaded from an external file.
    pub fn with_parts(
        oracle: Arc<dyn PunOracle>,
        resolver: FrameResolver,
        config: EngineConfig,
    ) -> Self {
        Self {
            oracle,
            resolver,
            validator: PunValidator::new(),
            config,
        }
    }

    /// Load a lexicon from a file for this engine, degrading to the
    /// built-in lexicon when the file is missing or corrupt.
    pub fn with_lexicon_path(mut self, path: &str) -> Self {
        match FrameLexicon::from_path(path) {
            Ok(lexicon) => {
                self.resolver = FrameResolver::new(Arc::new(lexicon));
            }
            Err(e) => {
                warn!("Frame lexicon '{}' unusable, using built-in: {}", path, e);
            }
        }
        self
    }

    /// Analyze a single sentence for puns.
    ///
    /// Fails only on empty input; every downstream failure degrades to a
    /// well-formed no-pun result with explanatory notes.
    pub async fn analyze(&self, sentence: &str) -> Result<PunAnalysisResult> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(PieError::InvalidInput("sentence is empty".to_string()));
        }

        let analysis = match self.propose_with_retry(sentence).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Oracle failed for sentence, degrading to no-pun result: {}", e);
                return Ok(PunAnalysisResult::degraded(
                    sentence.to_string(),
                    format!("Analysis degraded: {}", e),
                ));
            }
        };

        let mut notes: Vec<String> = Vec::new();
        if !analysis.analysis_notes.trim().is_empty() {
            notes.push(analysis.analysis_notes.trim().to_string());
        }

        let candidates = self.coerce_candidates(analysis.puns, &mut notes);

        let mut puns: Vec<Pun> = Vec::new();
        let mut below_threshold = 0usize;

        for candidate in candidates {
            let frame_distance = self.resolver.distance_with_hints(
                &candidate.sense1,
                &candidate.sense2,
                candidate.sense1_frame_hint.as_deref(),
                candidate.sense2_frame_hint.as_deref(),
            );
            let validation = self.validator.validate(&candidate, sentence);
            let confidence = combine_confidence(
                validation.overall_confidence,
                candidate.pun_type,
                frame_distance.distance,
            );

            if confidence < self.config.min_confidence {
                below_threshold += 1;
                debug!(
                    "Dropping '{}' ({:.2} below threshold {:.2})",
                    candidate.word_or_expression, confidence, self.config.min_confidence
                );
                continue;
            }

            puns.push(Pun::from_parts(candidate, frame_distance, validation, confidence));
        }

        if below_threshold > 0 {
            notes.push(format!(
                "{} candidate(s) dropped below the {:.2} confidence threshold",
                below_threshold, self.config.min_confidence
            ));
        }

        // Stable sort: ties keep the oracle's original ordering
        puns.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        info!(
            "Analyzed sentence: {} pun(s) retained",
            puns.len()
        );

        Ok(PunAnalysisResult::new(
            sentence.to_string(),
            puns,
            notes.join("; "),
        ))
    }

    /// [`analyze`](Self::analyze) under a caller-supplied deadline.
    ///
    /// Expiry aborts the in-flight oracle call and degrades to a no-pun
    /// result; it never leaves partial state behind.
    pub async fn analyze_with_deadline(
        &self,
        sentence: &str,
        deadline: Duration,
    ) -> Result<PunAnalysisResult> {
        match tokio::time::timeout(deadline, self.analyze(sentence)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Analysis deadline of {:?} expired", deadline);
                Ok(PunAnalysisResult::degraded(
                    sentence.trim().to_string(),
                    format!("Analysis degraded: deadline of {:?} expired", deadline),
                ))
            }
        }
    }

    /// Analyze a batch of sentences with bounded concurrency.
    ///
    /// Results come back in input order. Failures are isolated: an invalid
    /// or degraded sentence yields its own no-pun result and never aborts
    /// its siblings.
    pub async fn analyze_batch(&self, sentences: Vec<String>) -> Vec<PunAnalysisResult> {
        let semaphore = Arc::new(Semaphore::new(self.config.batch_concurrency.max(1)));
        let mut tasks: JoinSet<(usize, PunAnalysisResult)> = JoinSet::new();

        for (index, sentence) in sentences.iter().cloned().enumerate() {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // Closing the semaphore is impossible here, so acquire only
                // fails if the batch itself is torn down
                let _permit = semaphore.acquire().await;
                let result = match engine.analyze(&sentence).await {
                    Ok(result) => result,
                    Err(e) => PunAnalysisResult::degraded(
                        sentence.clone(),
                        format!("Analysis degraded: {}", e),
                    ),
                };
                (index, result)
            });
        }

        let mut slots: Vec<Option<PunAnalysisResult>> = vec![None; sentences.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Batch task panicked or was cancelled: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(sentences)
            .map(|(slot, sentence)| {
                slot.unwrap_or_else(|| {
                    PunAnalysisResult::degraded(sentence, "Analysis degraded: task failed")
                })
            })
            .collect()
    }

    /// Snapshot of the engine's configuration for diagnostics.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            model: self.oracle.model().to_string(),
            lexicon_source: self.resolver.lexicon().source().to_string(),
            lexicon_frames: self.resolver.lexicon().frame_count(),
            min_confidence: self.config.min_confidence,
        }
    }

    /// Call the oracle with bounded exponential backoff.
    ///
    /// Only transient failures are retried; a malformed response is final
    /// because resending the same sentence rarely fixes a schema violation.
    async fn propose_with_retry(&self, sentence: &str) -> Result<OracleAnalysis> {
        let mut attempt: u32 = 0;

        loop {
            match self.oracle.propose(sentence).await {
                Ok(analysis) => return Ok(analysis),
                Err(e) => {
                    if !e.is_retryable() || attempt >= self.config.max_retries {
                        return Err(e);
                    }

                    let backoff_ms = backoff_delay_ms(self.config.backoff_base_ms, attempt);
                    warn!(
                        "Oracle call failed, retrying after {}ms (attempt {}/{}): {}",
                        backoff_ms,
                        attempt + 1,
                        self.config.max_retries,
                        e
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Coerce untrusted oracle records into typed candidates, recording a
    /// note for everything rejected.
    fn coerce_candidates(
        &self,
        records: Vec<RawPunRecord>,
        notes: &mut Vec<String>,
    ) -> Vec<PunCandidate> {
        let mut candidates = Vec::with_capacity(records.len());

        for record in records {
            let word = record.word_or_expression.trim();
            if word.is_empty() {
                notes.push("Skipped a candidate with no pun expression".to_string());
                continue;
            }

            let pun_type = match PunType::parse(&record.pun_type) {
                Some(t) => t,
                None => {
                    notes.push(format!(
                        "Skipped candidate '{}' with unrecognized pun type '{}'",
                        word, record.pun_type
                    ));
                    continue;
                }
            };

            let sense1 = record.sense1.trim();
            let sense2 = record.sense2.trim();
            if sense1.is_empty() || sense2.is_empty() {
                notes.push(format!(
                    "Skipped candidate '{}' with a missing sense",
                    word
                ));
                continue;
            }
            if sense1.eq_ignore_ascii_case(sense2) {
                notes.push(format!(
                    "Skipped candidate '{}' whose senses are not distinct",
                    word
                ));
                continue;
            }

            candidates.push(PunCandidate {
                word_or_expression: word.to_string(),
                pun_type,
                sense1: sense1.to_string(),
                sense2: sense2.to_string(),
                sense1_frame_hint: record.sense1_frame,
                sense2_frame_hint: record.sense2_frame,
                explanation: record.explanation.trim().to_string(),
            });
        }

        candidates
    }
}

/// Exponential backoff delay for a retry attempt, saturating instead of
/// overflowing under extreme retry configurations.
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(2_u64.saturating_pow(attempt))
}

/// Blend validation confidence with a frame-distance adjustment.
///
/// Greater semantic distance between the senses strengthens the case for
/// pun types that hinge on one surface form (homographic, antanaclasis).
/// The bonus is capped so the result stays in [0, 1].
fn combine_confidence(validation_confidence: f64, pun_type: PunType, distance: f64) -> f64 {
    let bonus = if pun_type.distance_sensitive() && distance > 0.0 {
        (distance * FRAME_BONUS_PER_UNIT).min(FRAME_BONUS_CAP)
    } else {
        0.0
    };
    (validation_confidence + bonus).clamp(0.0, 1.0)
}
