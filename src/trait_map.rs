//! Trait mapper
//!
//! Projects a feature vector onto named trait/style proxy scores. Every trait
//! is one row of a declarative weight table; adding a trait is a data change,
//! never a control-flow change. Scores come with a full contributor trace so
//! they can be replayed exactly.

use crate::errors::{EngineError, EngineResult};
use crate::features::{declared_features, FeatureVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version identifier for the weight tables. Bump on any change to
/// [`TRAIT_TABLE`]; pinned into every report.
pub const WEIGHTS_VERSION: &str = "weights-v2";

/// One trait definition: a calibration scale and a fixed list of
/// `(feature, weight)` pairs. Weights are configuration data, not learned.
#[derive(Debug, Clone, Serialize)]
pub struct TraitSpec {
    pub name: &'static str,
    /// Per-trait calibration constant; one unit of weighted feature deviation
    /// moves the score by `scale` points before clamping.
    pub scale: f64,
    pub weights: &'static [(&'static str, f64)],
}

/// Big-five proxies plus style signals. Rates sit in `[0,1]`, so weights are
/// in the tens; `avg_sentence_len` is in words, so its weights stay below 1.
///
/// Survey features sit at 0.5 for a neutral all-3s answer, so a trait's
/// neutral baseline is `50 + 0.5 * Σ(survey weights)`. Survey weights are
/// kept at or below 16 so every neutral baseline stays under 60, below every
/// narrative rule and suggestion threshold: a neutral, empty-text intake
/// produces no hypotheses.
pub const TRAIT_TABLE: &[TraitSpec] = &[
    TraitSpec {
        name: "openness",
        scale: 1.0,
        weights: &[
            ("creative_rate", 45.0),
            ("hedge_rate", 8.0),
            ("avg_sentence_len", 0.5),
            ("survey_novelty_seeking", 16.0),
        ],
    },
    TraitSpec {
        name: "conscientiousness",
        scale: 1.0,
        weights: &[
            ("survey_structure_preference", 16.0),
            ("punct_density", -30.0),
            ("certainty_rate", 10.0),
        ],
    },
    TraitSpec {
        name: "extraversion",
        scale: 1.0,
        weights: &[
            ("survey_social_energy", 16.0),
            ("caps_ratio", 15.0),
            ("first_person_rate", 10.0),
        ],
    },
    TraitSpec {
        name: "agreeableness",
        scale: 1.0,
        weights: &[
            ("hedge_rate", 35.0),
            ("certainty_rate", -30.0),
            ("emotion_rate", 10.0),
        ],
    },
    TraitSpec {
        name: "neuroticism",
        scale: 1.0,
        weights: &[
            ("survey_sensory_sensitivity", 16.0),
            ("emotion_rate", 40.0),
            ("punct_density", 10.0),
        ],
    },
    TraitSpec {
        name: "intensity",
        scale: 1.0,
        weights: &[
            ("intensifier_rate", 45.0),
            ("caps_ratio", 12.0),
            ("certainty_rate", 10.0),
            ("survey_hyperfocus", 16.0),
        ],
    },
    TraitSpec {
        name: "systems_thinking",
        scale: 1.0,
        weights: &[
            ("technical_lexicon_rate", 50.0),
            ("avg_sentence_len", 0.8),
            ("survey_structure_preference", 12.0),
        ],
    },
    TraitSpec {
        name: "ambiguity_tolerance",
        scale: 1.0,
        weights: &[
            ("hedge_rate", 40.0),
            ("certainty_rate", -40.0),
            ("survey_novelty_seeking", 12.0),
        ],
    },
];

/// One explained term of a trait score: `contribution = weight * value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contributor {
    pub feature: String,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// A scored trait with its replayable contributor trace. The invariant
/// `value == clamp(50 + raw * scale, 0, 100)` with `raw == Σ contributions`
/// holds for every score the mapper emits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraitScore {
    pub value: f64,
    pub raw: f64,
    pub scale: f64,
    pub contributors: Vec<Contributor>,
}

/// Scores keyed by trait name, in deterministic order.
pub type TraitScores = BTreeMap<String, TraitScore>;

fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Verify every weight table row references only declared features and that
/// trait names are unique. Called once at engine construction; a failure here
/// is a configuration-integrity fault, never a request-time error.
pub fn validate_catalog() -> EngineResult<()> {
    let vocabulary = declared_features();
    let mut seen = std::collections::HashSet::new();
    for spec in TRAIT_TABLE {
        if !seen.insert(spec.name) {
            return Err(EngineError::config(format!(
                "duplicate trait name: {}",
                spec.name
            )));
        }
        if !spec.scale.is_finite() || spec.scale <= 0.0 {
            return Err(EngineError::config(format!(
                "trait {} has non-positive scale {}",
                spec.name, spec.scale
            )));
        }
        for (feature, weight) in spec.weights {
            if !vocabulary.iter().any(|f| f == feature) {
                return Err(EngineError::config(format!(
                    "trait {} references unknown feature {}",
                    spec.name, feature
                )));
            }
            if !weight.is_finite() {
                return Err(EngineError::config(format!(
                    "trait {} has non-finite weight for {}",
                    spec.name, feature
                )));
            }
        }
    }
    Ok(())
}

/// Score every trait in the table. Total and deterministic.
pub fn map_traits(fv: &FeatureVector) -> TraitScores {
    TRAIT_TABLE
        .iter()
        .map(|spec| (spec.name.to_string(), score_trait(spec, fv)))
        .collect()
}

fn score_trait(spec: &TraitSpec, fv: &FeatureVector) -> TraitScore {
    let mut contributors: Vec<Contributor> = spec
        .weights
        .iter()
        .filter(|(_, w)| *w != 0.0)
        .map(|(feature, weight)| {
            let value = fv.get(feature);
            Contributor {
                feature: feature.to_string(),
                value,
                weight: *weight,
                contribution: weight * value,
            }
        })
        .collect();

    // Descending |contribution|, ties broken lexicographically by feature
    // name so the trace is stable across runs.
    contributors.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });

    let raw: f64 = contributors.iter().map(|c| c.contribution).sum();
    let value = clamp(50.0 + raw * spec.scale, 0.0, 100.0);

    TraitScore {
        value,
        raw,
        scale: spec.scale,
        contributors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract;
    use crate::intake::{IntakeRecord, SURVEY_KEYS};
    use std::collections::BTreeMap;

    fn neutral_record(free_text: &str) -> IntakeRecord {
        let survey = SURVEY_KEYS.iter().map(|k| (k.to_string(), 3u8)).collect();
        IntakeRecord {
            survey,
            free_text: free_text.to_string(),
        }
    }

    #[test]
    fn catalog_is_internally_consistent() {
        validate_catalog().unwrap();
    }

    #[test]
    fn neutral_survey_baselines_stay_below_rule_thresholds() {
        // All-3s answers put every survey feature at 0.5; with no text the
        // baselines must sit under 60 so no narrative rule can fire on a
        // profile that carries no evidence.
        let scores = map_traits(&extract(&neutral_record("")));
        for (name, score) in &scores {
            assert!(
                (50.0..60.0).contains(&score.value),
                "neutral baseline for {name} out of band: {}",
                score.value
            );
        }
    }

    #[test]
    fn all_scores_stay_in_range() {
        let extremes: Vec<BTreeMap<String, u8>> = vec![
            SURVEY_KEYS.iter().map(|k| (k.to_string(), 1u8)).collect(),
            SURVEY_KEYS.iter().map(|k| (k.to_string(), 5u8)).collect(),
        ];
        for survey in extremes {
            let record = IntakeRecord {
                survey,
                free_text: "very very very extremely absolutely totally!".into(),
            };
            let scores = map_traits(&extract(&record));
            for (name, score) in &scores {
                assert!(
                    (0.0..=100.0).contains(&score.value),
                    "{name} out of range: {}",
                    score.value
                );
            }
        }
    }

    #[test]
    fn contributions_replay_the_score_exactly() {
        let scores = map_traits(&extract(&neutral_record(
            "I might deploy the api server, maybe with docker.",
        )));
        for (name, score) in &scores {
            let sum: f64 = score.contributors.iter().map(|c| c.contribution).sum();
            assert!((sum - score.raw).abs() < 1e-12, "{name} raw mismatch");
            let unclamped = 50.0 + score.raw * score.scale;
            if (0.0..=100.0).contains(&unclamped) {
                assert!((score.value - unclamped).abs() < 1e-12, "{name} value mismatch");
            } else {
                assert!(score.value == 0.0 || score.value == 100.0);
            }
        }
    }

    #[test]
    fn contributors_sorted_by_magnitude_then_name() {
        let scores = map_traits(&extract(&neutral_record("")));
        for score in scores.values() {
            for pair in score.contributors.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let ord = b
                    .contribution
                    .abs()
                    .partial_cmp(&a.contribution.abs())
                    .unwrap();
                assert!(
                    ord != std::cmp::Ordering::Greater,
                    "contributors out of order"
                );
                if a.contribution.abs() == b.contribution.abs() {
                    assert!(a.feature < b.feature, "tie not broken by name");
                }
            }
        }
    }

    #[test]
    fn saturation_clamps_instead_of_failing() {
        // Max survey plus a text that is nothing but intensifiers pushes
        // intensity past 100 before the clamp.
        let survey = SURVEY_KEYS.iter().map(|k| (k.to_string(), 5u8)).collect();
        let record = IntakeRecord {
            survey,
            free_text: "very extremely absolutely totally definitely utterly ".repeat(4),
        };
        let scores = map_traits(&extract(&record));
        let intensity = &scores["intensity"];
        assert_eq!(intensity.value, 100.0);
        assert!(50.0 + intensity.raw * intensity.scale > 100.0);
    }
}
