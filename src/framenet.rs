//! Lexical-frame resolution and frame distance
//!
//! Maps word senses to the semantic frames they evoke and measures the
//! separation between two frames over the frame-relation graph. The frame
//! lexicon is a read-only resource loaded once (built-in copy embedded in
//! the binary, or an external JSON file) and shared across analyses.
//!
//! Resolution is best-effort by contract: an unresolvable sense degrades to
//! an estimated distance with an explanatory note, never an error.

use crate::error::{PieError, Result};
use crate::text;
use crate::types::{DistanceType, Frame, FrameDistance};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Distance assigned to frames with no relation path between them
pub const UNRELATED_DISTANCE: f64 = 10.0;

/// Distance used when estimation has nothing to work with
const ESTIMATED_DEFAULT_DISTANCE: f64 = 5.0;

/// Relation-graph search depth bound; paths longer than this count as unrelated
const MAX_RELATION_HOPS: usize = 4;

/// Built-in frame lexicon, embedded at compile time
static BUILTIN_LEXICON: Lazy<Arc<FrameLexicon>> = Lazy::new(|| {
    let json = include_str!("../data/frame_lexicon.json");
    let lexicon = FrameLexicon::from_json(json, "built-in")
        .expect("embedded frame lexicon must be valid JSON");
    Arc::new(lexicon)
});

/// One frame entry as stored in the lexicon file
#[derive(Debug, Deserialize)]
struct LexiconEntry {
    name: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    lexical_units: Vec<String>,
    #[serde(default)]
    related: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    frames: Vec<LexiconEntry>,
}

/// Read-only frame lexicon indexed by lexical unit
///
/// Safe for concurrent reads; never mutated after construction.
#[derive(Debug)]
pub struct FrameLexicon {
    /// Frame name -> frame
    frames: HashMap<String, Frame>,

    /// Stemmed lexical unit -> frame names evoking it, in file order
    lu_index: HashMap<String, Vec<String>>,

    /// Symmetric frame-relation adjacency
    relations: HashMap<String, Vec<String>>,

    /// Where the lexicon came from, for status reporting
    source: String,
}

impl FrameLexicon {
    /// Parse a lexicon from JSON text.
    pub fn from_json(json: &str, source: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(json)?;

        let mut frames = HashMap::new();
        let mut lu_index: HashMap<String, Vec<String>> = HashMap::new();
        let mut relations: HashMap<String, Vec<String>> = HashMap::new();

        for entry in &file.frames {
            frames.insert(
                entry.name.clone(),
                Frame {
                    name: entry.name.clone(),
                    definition: entry.definition.clone(),
                },
            );

            for lu in &entry.lexical_units {
                let key = text::stem(lu);
                let frame_names = lu_index.entry(key).or_default();
                if !frame_names.contains(&entry.name) {
                    frame_names.push(entry.name.clone());
                }
            }
        }

        // Relations are stored one-way in the file but traversed symmetrically
        for entry in &file.frames {
            for other in &entry.related {
                if !frames.contains_key(other) {
                    warn!(
                        "Lexicon '{}': frame '{}' relates to unknown frame '{}'",
                        source, entry.name, other
                    );
                    continue;
                }
                let fwd = relations.entry(entry.name.clone()).or_default();
                if !fwd.contains(other) {
                    fwd.push(other.clone());
                }
                let back = relations.entry(other.clone()).or_default();
                if !back.contains(&entry.name) {
                    back.push(entry.name.clone());
                }
            }
        }

        debug!(
            "Loaded frame lexicon '{}': {} frames, {} lexical units",
            source,
            frames.len(),
            lu_index.len()
        );

        Ok(Self {
            frames,
            lu_index,
            relations,
            source: source.to_string(),
        })
    }

    /// Load a lexicon from an external JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PieError::ResourceUnavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json, &path.display().to_string())
            .map_err(|e| PieError::ResourceUnavailable(format!("{}: {}", path.display(), e)))
    }

    /// The built-in lexicon embedded in the binary.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN_LEXICON)
    }

    /// Number of frames in the lexicon.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Where this lexicon was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Look up a frame by exact name.
    pub fn frame_by_name(&self, name: &str) -> Option<&Frame> {
        self.frames.get(name)
    }

    /// Frames evoked by a lexical unit, most established first.
    pub fn frames_for_word(&self, word: &str) -> Vec<&Frame> {
        self.lu_index
            .get(&text::stem(word))
            .map(|names| names.iter().filter_map(|n| self.frames.get(n)).collect())
            .unwrap_or_default()
    }

    /// Shortest relation-path length between two frames, within the hop bound.
    fn relation_hops(&self, from: &str, to: &str) -> Option<usize> {
        if from == to {
            return Some(0);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        seen.insert(from);
        queue.push_back((from, 0));

        while let Some((frame, hops)) = queue.pop_front() {
            if hops >= MAX_RELATION_HOPS {
                continue;
            }
            if let Some(neighbors) = self.relations.get(frame) {
                for next in neighbors {
                    if next.as_str() == to {
                        return Some(hops + 1);
                    }
                    if seen.insert(next.as_str()) {
                        queue.push_back((next.as_str(), hops + 1));
                    }
                }
            }
        }

        None
    }
}

/// Resolver from word senses to frames and frame distances
///
/// Cheap to clone; the lexicon behind it is shared and read-only.
#[derive(Debug, Clone)]
pub struct FrameResolver {
    lexicon: Arc<FrameLexicon>,
}

impl FrameResolver {
    /// Create a resolver over a loaded lexicon.
    pub fn new(lexicon: Arc<FrameLexicon>) -> Self {
        Self { lexicon }
    }

    /// Create a resolver over the built-in lexicon.
    pub fn with_builtin() -> Self {
        Self::new(FrameLexicon::builtin())
    }

    /// The lexicon this resolver queries.
    pub fn lexicon(&self) -> &FrameLexicon {
        &self.lexicon
    }

    /// Resolve a sense gloss to its dominant frame.
    ///
    /// A hint (an oracle-proposed frame name) wins when it names a known
    /// frame; otherwise the gloss's content words vote by lexical-unit
    /// lookup, ties going to the earliest-mentioned word.
    fn resolve_sense(&self, sense: &str, hint: Option<&str>) -> Option<Frame> {
        if let Some(hint) = hint {
            if let Some(frame) = self.lexicon.frame_by_name(hint.trim()) {
                return Some(frame.clone());
            }
        }

        let mut tally: Vec<(String, usize)> = Vec::new();
        for word in text::content_words(sense) {
            for frame in self.lexicon.frames_for_word(&word) {
                match tally.iter_mut().find(|(name, _)| *name == frame.name) {
                    Some((_, count)) => *count += 1,
                    None => tally.push((frame.name.clone(), 1)),
                }
            }
        }

        // Earliest-mentioned frame wins ties, keeping resolution deterministic
        let mut best: Option<(&str, usize)> = None;
        for (name, count) in &tally {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((name, *count));
            }
        }
        self.lexicon.frame_by_name(best?.0).cloned()
    }

    /// Measure the frame distance between two sense glosses.
    ///
    /// Never fails: unresolved senses fall back to an estimated distance
    /// with the fallback named in the explanation.
    pub fn distance(&self, sense1: &str, sense2: &str) -> FrameDistance {
        self.distance_with_hints(sense1, sense2, None, None)
    }

    /// [`distance`](Self::distance) with oracle-proposed frame-name hints.
    pub fn distance_with_hints(
        &self,
        sense1: &str,
        sense2: &str,
        hint1: Option<&str>,
        hint2: Option<&str>,
    ) -> FrameDistance {
        let frame1 = self.resolve_sense(sense1, hint1);
        let frame2 = self.resolve_sense(sense2, hint2);

        match (&frame1, &frame2) {
            (Some(f1), Some(f2)) => {
                let (distance, explanation) = match self.lexicon.relation_hops(&f1.name, &f2.name)
                {
                    Some(0) => (0.0, format!("Both senses evoke the frame '{}'", f1.name)),
                    Some(hops) => (
                        hops as f64,
                        format!(
                            "Frames '{}' and '{}' are connected by {} relation hop(s)",
                            f1.name, f2.name, hops
                        ),
                    ),
                    None => (
                        UNRELATED_DISTANCE,
                        format!(
                            "No relation path between '{}' and '{}' within {} hops; \
                             scored at the unrelated ceiling",
                            f1.name, f2.name, MAX_RELATION_HOPS
                        ),
                    ),
                };

                FrameDistance {
                    distance,
                    distance_type: DistanceType::Computed,
                    explanation,
                    sense1_frame: frame1,
                    sense2_frame: frame2,
                }
            }
            _ => self.estimate(sense1, sense2, frame1, frame2),
        }
    }

    /// Lexical-overlap fallback when one or both senses fail to resolve.
    fn estimate(
        &self,
        sense1: &str,
        sense2: &str,
        frame1: Option<Frame>,
        frame2: Option<Frame>,
    ) -> FrameDistance {
        let stems1: HashSet<String> = text::content_words(sense1)
            .iter()
            .map(|w| text::stem(w))
            .collect();
        let stems2: HashSet<String> = text::content_words(sense2)
            .iter()
            .map(|w| text::stem(w))
            .collect();

        let (distance, detail) = if stems1.is_empty() || stems2.is_empty() {
            (
                ESTIMATED_DEFAULT_DISTANCE,
                "no usable content words in one or both glosses".to_string(),
            )
        } else {
            let shared = stems1.intersection(&stems2).count() as f64;
            let union = stems1.union(&stems2).count() as f64;
            let overlap = shared / union;
            (
                UNRELATED_DISTANCE * (1.0 - overlap),
                format!("gloss overlap {:.2} mapped onto the distance scale", overlap),
            )
        };

        let resolution = match (&frame1, &frame2) {
            (None, None) => "Neither sense resolved",
            (None, Some(_)) => "Only the second sense resolved",
            (Some(_), None) => "Only the first sense resolved",
            (Some(_), Some(_)) => unreachable!("estimate called with both senses resolved"),
        };

        debug!("Frame distance estimated lexically: {}", detail);

        FrameDistance {
            distance,
            distance_type: DistanceType::Estimated,
            explanation: format!(
                "{} to a frame in the lexicon; fell back to a lexical estimate ({})",
                resolution, detail
            ),
            sense1_frame: frame1,
            sense2_frame: frame2,
        }
    }
}
