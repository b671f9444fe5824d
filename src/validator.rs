//! Independent validation of pun candidates
//!
//! Two oracle-free checks confirm what the reasoning oracle proposed:
//!
//! - **Distributional check**: are both senses plausibly activated by the
//!   words surrounding the pun? A genuine pun needs context pulling toward
//!   each meaning.
//! - **Substitution check**: does replacing the pun word with a paraphrase
//!   of each sense still yield a coherent sentence?
//!
//! Both checks are deterministic lexical heuristics: the same candidate and
//! sentence always produce the same verdict, and malformed input degrades to
//! a double-fail with an explanation rather than an error. This stage must
//! never take the pipeline down.

use crate::text;
use crate::types::{PunCandidate, ValidationResult};
use tracing::debug;

/// Confidence when both checks pass
const BOTH_PASS_CONFIDENCE: f64 = 0.9;

/// Confidence when exactly one check passes
const ONE_PASS_CONFIDENCE: f64 = 0.5;

/// Confidence when neither check passes
const NONE_PASS_CONFIDENCE: f64 = 0.1;

/// Minimum shared prefix length for two words to count as related
const PREFIX_MATCH_LEN: usize = 4;

/// Deterministic validator for pun candidates
#[derive(Debug, Clone, Default)]
pub struct PunValidator;

impl PunValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run both checks against a candidate in its source sentence.
    pub fn validate(&self, candidate: &PunCandidate, sentence: &str) -> ValidationResult {
        let (distributional_valid, distributional_explanation) =
            self.distributional_check(candidate, sentence);
        let (substitution_valid, substitution_explanation) =
            self.substitution_check(candidate, sentence);

        let passes = distributional_valid as u8 + substitution_valid as u8;
        let overall_confidence = match passes {
            2 => BOTH_PASS_CONFIDENCE,
            1 => ONE_PASS_CONFIDENCE,
            _ => NONE_PASS_CONFIDENCE,
        };

        debug!(
            "Validated '{}': distributional={}, substitution={}, confidence={:.2}",
            candidate.word_or_expression, distributional_valid, substitution_valid,
            overall_confidence
        );

        ValidationResult {
            distributional_valid,
            distributional_explanation,
            substitution_valid,
            substitution_explanation,
            overall_confidence,
        }
    }

    /// Context words of the sentence, with the pun expression itself removed.
    fn context_words(&self, sentence: &str, pun_expression: &str) -> Vec<String> {
        let pun_tokens: Vec<String> = text::tokenize(pun_expression);
        text::content_words(sentence)
            .into_iter()
            .filter(|w| !pun_tokens.iter().any(|p| text::same_stem(w, p)))
            .collect()
    }

    /// Context words lending support to a sense gloss.
    fn supporting_words(&self, context: &[String], sense: &str) -> Vec<String> {
        let gloss_words = text::content_words(sense);
        context
            .iter()
            .filter(|w| gloss_words.iter().any(|g| related(w, g)))
            .cloned()
            .collect()
    }

    fn distributional_check(&self, candidate: &PunCandidate, sentence: &str) -> (bool, String) {
        if candidate.sense1.trim().is_empty() || candidate.sense2.trim().is_empty() {
            return (false, "One or both senses are empty".to_string());
        }

        let context = self.context_words(sentence, &candidate.word_or_expression);
        if context.is_empty() {
            return (
                false,
                "No context words besides the pun expression itself".to_string(),
            );
        }

        let support1 = self.supporting_words(&context, &candidate.sense1);
        let support2 = self.supporting_words(&context, &candidate.sense2);

        match (support1.is_empty(), support2.is_empty()) {
            (false, false) => (
                true,
                format!(
                    "Both senses are supported by context: sense1 by [{}], sense2 by [{}]",
                    support1.join(", "),
                    support2.join(", ")
                ),
            ),
            (false, true) => (
                false,
                format!(
                    "Only sense1 is supported by context ([{}]); \
                     no context words activate sense2",
                    support1.join(", ")
                ),
            ),
            (true, false) => (
                false,
                format!(
                    "Only sense2 is supported by context ([{}]); \
                     no context words activate sense1",
                    support2.join(", ")
                ),
            ),
            (true, true) => (
                false,
                "No context words lexically support either sense".to_string(),
            ),
        }
    }

    fn substitution_check(&self, candidate: &PunCandidate, sentence: &str) -> (bool, String) {
        let word = candidate.word_or_expression.trim();
        if word.is_empty() {
            return (false, "Candidate has no pun expression".to_string());
        }

        let head1 = paraphrase_head(&candidate.sense1);
        let head2 = paraphrase_head(&candidate.sense2);

        let (head1, head2) = match (head1, head2) {
            (Some(h1), Some(h2)) => (h1, h2),
            _ => {
                return (
                    false,
                    "Could not derive a paraphrase from one or both senses".to_string(),
                )
            }
        };

        if text::same_stem(&head1, &head2) {
            return (
                false,
                format!(
                    "Paraphrases of the two senses collapse to the same word '{}'",
                    head1
                ),
            );
        }

        let sub1 = replace_ignore_case(sentence, word, &head1);
        let sub2 = replace_ignore_case(sentence, word, &head2);

        match (sub1, sub2) {
            (Some(s1), Some(s2)) => (
                true,
                format!(
                    "Both substitutions read coherently: \"{}\" / \"{}\"",
                    s1, s2
                ),
            ),
            _ => (
                false,
                format!("Expression \"{}\" does not occur in the sentence", word),
            ),
        }
    }
}

/// Whether two words plausibly belong to the same lexical family.
fn related(a: &str, b: &str) -> bool {
    if text::same_stem(a, b) {
        return true;
    }
    // Derivational forms ("bank"/"banker") share a usable prefix
    a.len() >= PREFIX_MATCH_LEN
        && b.len() >= PREFIX_MATCH_LEN
        && a[..PREFIX_MATCH_LEN] == b[..PREFIX_MATCH_LEN]
}

/// Head content word of a sense paraphrase, used as the substitution stand-in.
fn paraphrase_head(sense: &str) -> Option<String> {
    text::content_words(sense).into_iter().next()
}

/// Replace the first occurrence of `word` in `sentence`, ignoring ASCII case.
///
/// Returns `None` when the word does not occur. Matching is done on byte
/// windows validated against char boundaries, so multi-byte text cannot
/// cause a panic.
fn replace_ignore_case(sentence: &str, word: &str, replacement: &str) -> Option<String> {
    if word.is_empty() {
        return None;
    }
    for (i, _) in sentence.char_indices() {
        if let Some(window) = sentence.get(i..i + word.len()) {
            if window.eq_ignore_ascii_case(word) {
                let mut out = String::with_capacity(sentence.len());
                out.push_str(&sentence[..i]);
                out.push_str(replacement);
                out.push_str(&sentence[i + word.len()..]);
                return Some(out);
            }
        }
    }
    None
}
