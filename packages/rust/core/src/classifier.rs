//! Keyword-based stage classifier.
//!
//! Scores each candidate stage by how many of its keywords appear as
//! substrings of the lowercased message, then picks the highest score.
//! Ties keep the stage listed first. No keyword hits routes to the first
//! stage with a fixed low confidence.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use tracing::debug;

use kitguide_shared::StagePrediction;

/// Stage reported when the kit has no stages at all.
pub const DEFAULT_STAGE: &str = "General Guidance";

const BASE_CONFIDENCE: f64 = 0.35;
const CONFIDENCE_PER_HIT: f64 = 0.2;
const MAX_CONFIDENCE: f64 = 0.95;
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Curated keywords for the stages shipped with the current kits.
pub const BUILTIN_STAGE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Body Making",
        &["body", "chassis", "frame", "assemble", "parts", "mechanical"],
    ),
    (
        "Circuit Building",
        &["circuit", "wire", "sensor", "board", "battery", "connection"],
    ),
    (
        "Frame Assembly",
        &["frame", "wheel", "mount", "caster", "chassis"],
    ),
    (
        "Sensor Logic",
        &["ultrasonic", "distance", "logic", "code", "detect", "sensor"],
    ),
];

// ---------------------------------------------------------------------------
// KeywordTable
// ---------------------------------------------------------------------------

/// Stage name → keyword list. Lookups are by exact stage name.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: HashMap<String, Vec<String>>,
}

impl KeywordTable {
    /// The curated table in [`BUILTIN_STAGE_KEYWORDS`].
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_STAGE_KEYWORDS
                .iter()
                .map(|(stage, keywords)| {
                    let keywords = keywords.iter().map(|k| k.to_string()).collect();
                    (stage.to_string(), keywords)
                }),
        )
    }

    /// Build a table from arbitrary entries. Keywords are lowercased and
    /// empty ones dropped, since an empty keyword would match every message.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(stage, keywords)| (stage, normalize_keywords(keywords)))
            .collect();
        Self { entries }
    }

    /// Replace or add entries, e.g. from the `[stage_keywords]` config table.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> Self {
        for (stage, keywords) in overrides {
            self.entries
                .insert(stage.clone(), normalize_keywords(keywords.clone()));
        }
        self
    }

    /// Keywords for `stage`, or the lowercased stage name when the table
    /// has no entry for it.
    pub fn keywords_for(&self, stage: &str) -> Cow<'_, [String]> {
        match self.entries.get(stage) {
            Some(keywords) => Cow::Borrowed(keywords.as_slice()),
            None => Cow::Owned(vec![stage.to_lowercase()]),
        }
    }
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// StageClassifier
// ---------------------------------------------------------------------------

/// Scores messages against a [`KeywordTable`].
#[derive(Debug, Clone)]
pub struct StageClassifier {
    table: KeywordTable,
}

impl Default for StageClassifier {
    fn default() -> Self {
        Self::new(KeywordTable::builtin())
    }
}

impl StageClassifier {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Number of `stage` keywords found anywhere in the lowercased text.
    /// Substring containment, not word matching: "code" hits "codependent".
    fn score(&self, lowered: &str, stage: &str) -> usize {
        self.table
            .keywords_for(stage)
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .count()
    }

    /// Pick the stage in `stages` that best matches `message`.
    pub fn classify<S: AsRef<str>>(&self, message: &str, stages: &[S]) -> StagePrediction {
        let lowered = message.to_lowercase();

        let mut best_stage = stages
            .first()
            .map(|s| s.as_ref())
            .unwrap_or(DEFAULT_STAGE);
        let mut best_score = 0;

        for stage in stages.iter().map(|s| s.as_ref()) {
            let score = self.score(&lowered, stage);
            if score > best_score {
                best_score = score;
                best_stage = stage;
            }
        }

        let prediction = if best_score > 0 {
            StagePrediction {
                stage: best_stage.to_string(),
                confidence: MAX_CONFIDENCE
                    .min(BASE_CONFIDENCE + best_score as f64 * CONFIDENCE_PER_HIT),
                reasoning: format!(
                    "Detected {best_score} stage keywords; routing learner to '{best_stage}'."
                ),
            }
        } else {
            StagePrediction {
                stage: best_stage.to_string(),
                confidence: FALLBACK_CONFIDENCE,
                reasoning: "No explicit stage keywords detected; using first stage as default learning path."
                    .to_string(),
            }
        };

        debug!(
            stage = %prediction.stage,
            score = best_score,
            confidence = prediction.confidence,
            "stage classified"
        );
        prediction
    }
}

static BUILTIN_CLASSIFIER: LazyLock<StageClassifier> = LazyLock::new(StageClassifier::default);

/// Classify with the built-in keyword table.
pub fn classify_stage<S: AsRef<str>>(message: &str, stages: &[S]) -> StagePrediction {
    BUILTIN_CLASSIFIER.classify(message, stages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
