//! PIE - Pun Identification Engine
//!
//! An LLM-assisted pipeline for detecting and classifying puns in
//! natural-language sentences:
//! - Candidate extraction and classification via an external reasoning oracle
//! - Frame-distance scoring between the two senses of each pun
//! - Independent distributional and substitution validation
//! - Confidence-ranked, schema-stable results even under oracle failure
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (PunCandidate, FrameDistance, Pun, ...)
//! - **Oracle**: The external reasoning service behind the `PunOracle` trait
//! - **FrameNet**: Read-only frame lexicon and distance resolver
//! - **Validator**: Deterministic lexical-semantic checks
//! - **Engine**: Orchestration, retry/degradation policy, batching
//!
//! # Example
//!
//! ```ignore
//! use pie_core::{AnalysisEngine, EngineConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = AnalysisEngine::new(EngineConfig::default())?;
//!
//!     let result = engine
//!         .analyze("I used to be a banker, but I lost interest.")
//!         .await?;
//!
//!     if result.has_pun {
//!         for pun in &result.puns {
//!             println!("{} ({}): {:.0}%", pun.word_or_expression, pun.pun_type,
//!                 pun.confidence * 100.0);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod framenet;
pub mod oracle;
pub mod text;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{AnalysisEngine, EngineStatus};
pub use error::{PieError, Result};
pub use framenet::{FrameLexicon, FrameResolver};
pub use oracle::{AnthropicOracle, OracleAnalysis, PunOracle, RawPunRecord};
pub use types::{
    DistanceType, Frame, FrameDistance, Pun, PunAnalysisResult, PunCandidate, PunType,
    ValidationResult,
};
pub use validator::PunValidator;
