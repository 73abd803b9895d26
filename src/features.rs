//! Feature extraction
//!
//! Turns a validated intake into a fixed-shape numeric feature vector. Total
//! and deterministic: extraction never fails, and every declared feature name
//! is present in every vector (zero-filled when there is no text), so no
//! downstream stage ever branches on a missing key.

use crate::intake::{IntakeRecord, SURVEY_KEYS};
use crate::lexicon;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Text-derived feature names. Rate features are ratios in `[0,1]`, never raw
/// counts, so they compare across text lengths.
pub const TEXT_FEATURES: [&str; 12] = [
    "token_count",
    "sentence_count",
    "avg_sentence_len",
    "intensifier_rate",
    "hedge_rate",
    "certainty_rate",
    "emotion_rate",
    "technical_lexicon_rate",
    "creative_rate",
    "first_person_rate",
    "caps_ratio",
    "punct_density",
];

/// Prefix under which survey answers appear as features.
pub const SURVEY_FEATURE_PREFIX: &str = "survey_";

/// The full fixed feature vocabulary: text features plus one rescaled slot per
/// survey key. Weight tables may only reference names from this set.
pub fn declared_features() -> Vec<String> {
    TEXT_FEATURES
        .iter()
        .map(|f| f.to_string())
        .chain(
            SURVEY_KEYS
                .iter()
                .map(|k| format!("{SURVEY_FEATURE_PREFIX}{k}")),
        )
        .collect()
}

/// Fixed-shape feature vector keyed by feature name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// Value of a feature; 0.0 for names outside the vocabulary. Catalog
    /// validation guarantees mapper lookups never hit the fallback.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

/// Split text into lowercase tokens: maximal runs of letters and apostrophes,
/// discarding runs with no letter at all. Whitespace, digits, and punctuation
/// are boundaries.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !(c.is_alphabetic() || c == '\''))
        .filter(|t| t.chars().any(|c| c.is_alphabetic()))
        .map(|t| t.trim_matches('\'').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Count sentence-terminal punctuation runs. Any non-whitespace text counts
/// as at least one sentence even without terminal punctuation.
pub fn sentence_count(text: &str) -> usize {
    let mut runs = 0usize;
    let mut in_run = false;
    for c in text.chars() {
        if matches!(c, '.' | '!' | '?') {
            if !in_run {
                runs += 1;
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }
    if runs == 0 && !text.trim().is_empty() {
        1
    } else {
        runs
    }
}

fn lexicon_rate(tokens: &[String], lexicon: &HashSet<&'static str>) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens.iter().filter(|t| lexicon.contains(t.as_str())).count();
    hits as f64 / tokens.len() as f64
}

/// Extract the feature vector for one intake. Total function: empty text
/// yields zeroes for every text feature, never NaN.
pub fn extract(record: &IntakeRecord) -> FeatureVector {
    let text = &record.free_text;
    let tokens = tokenize(text);
    let n_tokens = tokens.len();
    let n_sentences = sentence_count(text);

    let avg_sentence_len = if n_tokens == 0 {
        0.0
    } else {
        n_tokens as f64 / n_sentences.max(1) as f64
    };

    let alpha_total = text.chars().filter(|c| c.is_alphabetic()).count();
    let caps_ratio = if alpha_total == 0 {
        0.0
    } else {
        let upper = text.chars().filter(|c| c.is_uppercase()).count();
        upper as f64 / alpha_total as f64
    };

    let char_total = text.chars().count();
    let punct_density = if char_total == 0 {
        0.0
    } else {
        let punct = text
            .chars()
            .filter(|c| matches!(c, ',' | ';' | ':' | '—' | '-' | '(' | ')' | '<' | '>'))
            .count();
        punct as f64 / char_total as f64
    };

    let mut values = BTreeMap::new();
    values.insert("token_count".to_string(), n_tokens as f64);
    values.insert("sentence_count".to_string(), n_sentences as f64);
    values.insert("avg_sentence_len".to_string(), avg_sentence_len);
    values.insert(
        "intensifier_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::INTENSIFIERS),
    );
    values.insert(
        "hedge_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::HEDGES),
    );
    values.insert(
        "certainty_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::CERTAINTY),
    );
    values.insert(
        "emotion_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::EMOTION),
    );
    values.insert(
        "technical_lexicon_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::TECHNICAL),
    );
    values.insert(
        "creative_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::CREATIVE),
    );
    values.insert(
        "first_person_rate".to_string(),
        lexicon_rate(&tokens, &lexicon::FIRST_PERSON),
    );
    values.insert("caps_ratio".to_string(), caps_ratio);
    values.insert("punct_density".to_string(), punct_density);

    // Survey answers rescaled from 1..=5 to [0,1] so the mapper treats survey
    // and text signals uniformly. The gate guarantees answers in range, but
    // `IntakeRecord` can be built by hand; clamping keeps extraction total.
    for key in SURVEY_KEYS {
        let answer = record.survey.get(key).copied().unwrap_or(3).clamp(1, 5);
        values.insert(
            format!("{SURVEY_FEATURE_PREFIX}{key}"),
            f64::from(answer - 1) / 4.0,
        );
    }

    FeatureVector { values }
}
