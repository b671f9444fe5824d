//! Wire-shape stability tests
//!
//! The CLI and HTTP collaborators consume the serialized
//! `PunAnalysisResult` directly, so field names, casing, and nesting are a
//! contract. These tests pin that shape.

mod common;

use common::*;
use pie_core::{AnalysisEngine, PunAnalysisResult};
use serde_json::Value;
use std::sync::Arc;

async fn analyzed_banker_result() -> Value {
    let oracle = Arc::new(
        StubOracle::new().respond(BANKER_SENTENCE, analysis(vec![interest_record()], "classic")),
    );
    let engine = AnalysisEngine::with_oracle(oracle, fast_config());
    let result = engine.analyze(BANKER_SENTENCE).await.unwrap();
    serde_json::to_value(&result).unwrap()
}

#[tokio::test]
async fn result_serializes_to_the_documented_shape() {
    let json = analyzed_banker_result().await;

    assert_eq!(json["sentence"], BANKER_SENTENCE);
    assert_eq!(json["has_pun"], true);
    assert!(json["analysis_notes"].is_string());

    let puns = json["puns"].as_array().unwrap();
    assert_eq!(puns.len(), 1);

    let pun = &puns[0];
    assert_eq!(pun["word_or_expression"], "interest");
    assert_eq!(pun["pun_type"], "homographic");
    assert_eq!(pun["sense1"], "curiosity");
    assert_eq!(pun["sense2"], "money paid on a loan");
    assert!(pun["explanation"].is_string());
    assert!(pun["confidence"].as_f64().unwrap() > 0.3);

    let distance = &pun["frame_distance"];
    assert!(distance["distance"].as_f64().unwrap() > 0.0);
    assert_eq!(distance["distance_type"], "computed");
    assert!(distance["explanation"].is_string());
    assert_eq!(distance["sense1_frame"]["name"], "Emotion_directed");
    assert_eq!(distance["sense2_frame"]["name"], "Commerce_pay");

    let validation = &pun["validation"];
    assert!(validation["distributional_valid"].is_boolean());
    assert!(validation["distributional_explanation"].is_string());
    assert!(validation["substitution_valid"].is_boolean());
    assert!(validation["substitution_explanation"].is_string());
    let confidence = validation["overall_confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn internal_frame_hints_never_leak_into_the_wire() {
    let json = analyzed_banker_result().await;
    let pun = &json["puns"][0];
    assert!(pun.get("sense1_frame_hint").is_none());
    assert!(pun.get("sense2_frame_hint").is_none());
}

#[test]
fn degraded_result_is_schema_stable() {
    let result = PunAnalysisResult::degraded(
        "some sentence".to_string(),
        "Analysis degraded: oracle unavailable",
    );
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["sentence"], "some sentence");
    assert_eq!(json["has_pun"], false);
    assert_eq!(json["puns"].as_array().unwrap().len(), 0);
    assert_eq!(json["analysis_notes"], "Analysis degraded: oracle unavailable");
}

#[test]
fn result_round_trips_through_json() {
    let original = PunAnalysisResult::degraded("s".to_string(), "n");
    let json = serde_json::to_string(&original).unwrap();
    let parsed: PunAnalysisResult = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.sentence, original.sentence);
    assert_eq!(parsed.has_pun, original.has_pun);
    assert_eq!(parsed.analysis_notes, original.analysis_notes);
}
