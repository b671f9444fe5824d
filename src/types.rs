//! Core data types for the PIE pun identification engine
//!
//! This module defines the fundamental data structures flowing through the
//! analysis pipeline: pun candidates proposed by the reasoning oracle, frame
//! distance measurements, validation verdicts, and the top-level analysis
//! result. The serde derives on these types produce the stable JSON shape
//! consumed by the CLI and HTTP collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a pun by mechanism
///
/// A closed taxonomy: the oracle proposes a free-form label, but anything
/// outside these four values is rejected at the parsing boundary rather
/// than passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunType {
    /// Similar-sounding words ("a non-prophet institution")
    Homophonic,

    /// Same spelling, different meanings ("my shoe is a foot long")
    Homographic,

    /// Self-referential or term-dependent twist ("Immanuel doesn't pun, he Kant")
    Recursive,

    /// The same word repeated with two distinct senses
    /// ("we must all hang together or we shall all hang separately")
    Antanaclasis,
}

impl PunType {
    /// Parse an oracle-supplied label, tolerating case variance.
    ///
    /// Returns `None` for unrecognized labels; callers must treat that as a
    /// rejected candidate, never as a default classification.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "homophonic" => Some(PunType::Homophonic),
            "homographic" => Some(PunType::Homographic),
            "recursive" => Some(PunType::Recursive),
            "antanaclasis" => Some(PunType::Antanaclasis),
            _ => None,
        }
    }

    /// Whether frame distance strengthens the case for this pun type.
    ///
    /// Homographic and antanaclasis puns hinge on one surface form evoking
    /// two distant frames; for homophonic and recursive puns the surface
    /// forms differ, so frame distance carries less signal.
    pub fn distance_sensitive(&self) -> bool {
        matches!(self, PunType::Homographic | PunType::Antanaclasis)
    }
}

impl fmt::Display for PunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PunType::Homophonic => "homophonic",
            PunType::Homographic => "homographic",
            PunType::Recursive => "recursive",
            PunType::Antanaclasis => "antanaclasis",
        };
        write!(f, "{}", s)
    }
}

/// A semantic frame evoked by a word sense
///
/// Frames are lookup results owned by the lexicon, shared read-only; a
/// candidate only ever holds a clone of the resolved frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame name (e.g. "Commerce_pay", "Emotion_directed")
    pub name: String,

    /// Short definition of the situation type the frame captures
    #[serde(default)]
    pub definition: String,
}

/// How a frame distance was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceType {
    /// Both senses resolved to frames; distance comes from the relation graph
    Computed,

    /// One or both senses failed to resolve; a lexical-overlap proxy was used
    Estimated,
}

/// Frame distance measurement between the two senses of a pun
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDistance {
    /// Numeric distance (0 = same frame, up to a fixed ceiling for unrelated frames)
    pub distance: f64,

    /// How the distance was calculated
    pub distance_type: DistanceType,

    /// Human-readable explanation of the measurement
    pub explanation: String,

    /// Frame resolved for the first sense, if any
    pub sense1_frame: Option<Frame>,

    /// Frame resolved for the second sense, if any
    pub sense2_frame: Option<Frame>,
}

/// A pun candidate as proposed by the oracle, after schema validation
///
/// Immutable once created: the engine enriches a candidate by building a
/// [`Pun`] around it, never by mutating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunCandidate {
    /// The word or expression that creates the pun
    pub word_or_expression: String,

    /// Classification of the pun mechanism
    pub pun_type: PunType,

    /// First meaning activated by the pun
    pub sense1: String,

    /// Second meaning activated by the pun
    pub sense2: String,

    /// Frame name the oracle proposed for sense1, if any (lookup hint only)
    #[serde(default, skip_serializing)]
    pub sense1_frame_hint: Option<String>,

    /// Frame name the oracle proposed for sense2, if any (lookup hint only)
    #[serde(default, skip_serializing)]
    pub sense2_frame_hint: Option<String>,

    /// How the pun works, in the oracle's words
    pub explanation: String,
}

/// Verdicts from the two independent validation checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether both senses are plausibly activated by the sentence context
    pub distributional_valid: bool,

    /// Explanation of the distributional check
    pub distributional_explanation: String,

    /// Whether substituting a paraphrase of each sense keeps the sentence coherent
    pub substitution_valid: bool,

    /// Explanation of the substitution check
    pub substitution_explanation: String,

    /// Confidence (0.0 - 1.0) that this is a valid pun, from the checks alone
    pub overall_confidence: f64,
}

/// A fully-enriched pun: candidate plus frame distance, validation, and
/// the engine's combined confidence
///
/// Constructed only once every enrichment stage has run, so a `Pun` in a
/// result always carries a frame distance and a validation verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pun {
    /// The word or expression that creates the pun
    pub word_or_expression: String,

    /// Classification of the pun mechanism
    pub pun_type: PunType,

    /// First meaning activated by the pun
    pub sense1: String,

    /// Second meaning activated by the pun
    pub sense2: String,

    /// Frame distance between the two senses
    pub frame_distance: FrameDistance,

    /// How the pun works
    pub explanation: String,

    /// Validation verdicts
    pub validation: ValidationResult,

    /// Final combined confidence (validation blended with frame distance)
    pub confidence: f64,
}

impl Pun {
    /// Assemble a pun from its enrichment stages.
    ///
    /// Confidence is clamped into [0, 1] so a miscalibrated blend can never
    /// leak an out-of-range score into a result.
    pub fn from_parts(
        candidate: PunCandidate,
        frame_distance: FrameDistance,
        validation: ValidationResult,
        confidence: f64,
    ) -> Self {
        Self {
            word_or_expression: candidate.word_or_expression,
            pun_type: candidate.pun_type,
            sense1: candidate.sense1,
            sense2: candidate.sense2,
            frame_distance,
            explanation: candidate.explanation,
            validation,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Complete result of pun analysis on a single sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunAnalysisResult {
    /// The sentence that was analyzed
    pub sentence: String,

    /// Whether any pun survived validation and thresholding
    pub has_pun: bool,

    /// Surviving puns, ordered by descending confidence
    pub puns: Vec<Pun>,

    /// Notes accumulated during analysis (oracle remarks, skipped candidates,
    /// degradation reasons); may be empty
    pub analysis_notes: String,
}

impl PunAnalysisResult {
    /// Build a result from the surviving puns, deriving `has_pun`.
    pub fn new(sentence: String, puns: Vec<Pun>, analysis_notes: String) -> Self {
        Self {
            sentence,
            has_pun: !puns.is_empty(),
            puns,
            analysis_notes,
        }
    }

    /// A well-formed no-pun result carrying an explanatory note.
    ///
    /// Used when the pipeline degrades (oracle failure, deadline expiry)
    /// so callers always receive a schema-stable object.
    pub fn degraded(sentence: String, note: impl Into<String>) -> Self {
        Self {
            sentence,
            has_pun: false,
            puns: Vec::new(),
            analysis_notes: note.into(),
        }
    }
}
