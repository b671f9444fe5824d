//! Tokenization helpers shared by the frame resolver and the validator
//!
//! Deliberately lightweight: lowercase word extraction, a small function-word
//! list, and suffix-stripping stemming. Enough to compare sense glosses
//! against sentence context without pulling in a full NLP stack.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z']+").expect("valid word regex"));

/// High-frequency English function words, skipped when extracting context.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // articles & determiners
        "the", "a", "an", "this", "that", "these", "those", "some", "any", "each", "every",
        // be-verbs
        "is", "are", "was", "were", "be", "been", "being", "am",
        // auxiliaries & modals
        "have", "has", "had", "do", "does", "did", "will", "would", "shall", "should", "may",
        "might", "can", "could", "must",
        // prepositions
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "into", "about", "up",
        "down", "out", "over", "under",
        // conjunctions & negation
        "and", "or", "but", "not", "no", "nor", "if", "then", "than", "so", "as", "because",
        // pronouns
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my",
        "your", "his", "our", "their", "its", "who", "what", "which", "there", "here",
        // common adverbs/particles
        "very", "too", "also", "just", "only", "how", "when", "where", "why",
    ]
    .into_iter()
    .collect()
});

/// Irregular forms the suffix rules cannot reach.
const IRREGULAR_STEMS: &[(&str, &str)] = &[
    ("paid", "pay"),
    ("lost", "lose"),
    ("made", "make"),
    ("left", "leave"),
    ("found", "find"),
    ("flew", "fly"),
    ("went", "go"),
    ("said", "say"),
    ("kept", "keep"),
];

/// Extract lowercase word tokens from a text.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whether a token is a high-frequency function word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Content words of a text: tokens minus function words.
pub fn content_words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().filter(|w| !is_stop_word(w)).collect()
}

/// Reduce a word to a crude stem via irregular lookup and suffix stripping.
///
/// Not a real stemmer; the only contract is determinism and that inflected
/// forms of the same word usually collide.
pub fn stem(word: &str) -> String {
    let word = word.to_lowercase();

    for (form, base) in IRREGULAR_STEMS {
        if word == *form {
            return (*base).to_string();
        }
    }

    if let Some(base) = word.strip_suffix("ies") {
        if base.len() >= 2 {
            return format!("{}y", base);
        }
    }
    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(base) = word.strip_suffix(suffix) {
            if base.len() >= 3 {
                return base.to_string();
            }
        }
    }

    word
}

/// Whether two words share a stem.
pub fn same_stem(a: &str, b: &str) -> bool {
    stem(a) == stem(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokens = tokenize("I used to be a Banker, but I lost interest.");
        assert_eq!(
            tokens,
            vec!["i", "used", "to", "be", "a", "banker", "but", "i", "lost", "interest"]
        );
    }

    #[test]
    fn test_content_words_drop_function_words() {
        let words = content_words("The weather is nice today.");
        assert_eq!(words, vec!["weather", "nice", "today"]);
    }

    #[test]
    fn test_stemming() {
        assert_eq!(stem("flies"), "fly");
        assert_eq!(stem("paid"), "pay");
        assert_eq!(stem("banking"), "bank");
        assert_eq!(stem("loans"), "loan");
        assert_eq!(stem("interest"), "interest");
        // Short bases are left alone rather than mangled
        assert_eq!(stem("bed"), "bed");
    }

    #[test]
    fn test_same_stem() {
        assert!(same_stem("loan", "loans"));
        assert!(same_stem("pay", "paid"));
        assert!(!same_stem("loan", "lawn"));
    }
}
