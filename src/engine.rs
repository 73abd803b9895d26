//! Engine assembly
//!
//! Composes the pipeline: validate -> extract -> map -> (narrate, explain)
//! -> report. The engine is stateless per invocation; one intake in, one
//! reproducible report out. Catalog and rule tables are checked once at
//! construction, so request handling can treat stages 2-5 as total.

use crate::errors::EngineResult;
use crate::explain::{explain, DEFAULT_TOP_N};
use crate::features::extract;
use crate::intake::{validate, RawIntake, DEFAULT_MAX_FREE_TEXT};
use crate::lexicon::LEXICON_VERSION;
use crate::narrative::{narrate, suggest, validate_rules, Hypothesis, DISCLAIMER};
use crate::trait_map::{map_traits, validate_catalog, Contributor, TraitScores, WEIGHTS_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Engine tuning knobs. Defaults match the product decisions recorded in the
/// intake and explainability modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_free_text")]
    pub max_free_text_len: usize,
    #[serde(default = "default_explain_top_n")]
    pub explain_top_n: usize,
}

fn default_max_free_text() -> usize {
    DEFAULT_MAX_FREE_TEXT
}

fn default_explain_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_free_text_len: default_max_free_text(),
            explain_top_n: default_explain_top_n(),
        }
    }
}

/// Version identifiers pinned into every report so table drift across
/// releases is detectable rather than silent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineVersion {
    pub engine: String,
    pub lexicon: String,
    pub weights: String,
}

impl EngineVersion {
    pub fn current() -> Self {
        Self {
            engine: env!("CARGO_PKG_VERSION").to_string(),
            lexicon: LEXICON_VERSION.to_string(),
            weights: WEIGHTS_VERSION.to_string(),
        }
    }
}

/// Narrative block of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Narrative {
    pub hypotheses: Vec<Hypothesis>,
    pub suggestions: Vec<String>,
    pub disclaimer: String,
    pub explainability: BTreeMap<String, Vec<Contributor>>,
}

/// Full engine-side report: scores with complete traces, narrative, pinned
/// versions, and the intake digest callers can memoize on. Immutable once
/// produced; session/report ids belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub engine_version: EngineVersion,
    pub intake_digest: String,
    pub scores: TraitScores,
    pub narrative: Narrative,
}

/// Wire shape consumed by the reporting collaborator: bare score values and
/// hypothesis texts, with the explainability sample alongside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireReport {
    pub engine_version: EngineVersion,
    pub intake_digest: String,
    pub scores: BTreeMap<String, f64>,
    pub narrative: WireNarrative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireNarrative {
    pub hypotheses: Vec<String>,
    pub suggestions: Vec<String>,
    pub disclaimer: String,
    pub explainability: BTreeMap<String, Vec<Contributor>>,
}

impl Report {
    /// Project down to the wire shape.
    pub fn wire(&self) -> WireReport {
        WireReport {
            engine_version: self.engine_version.clone(),
            intake_digest: self.intake_digest.clone(),
            scores: self
                .scores
                .iter()
                .map(|(name, score)| (name.clone(), score.value))
                .collect(),
            narrative: WireNarrative {
                hypotheses: self
                    .narrative
                    .hypotheses
                    .iter()
                    .map(|h| h.text.clone())
                    .collect(),
                suggestions: self.narrative.suggestions.clone(),
                disclaimer: self.narrative.disclaimer.clone(),
                explainability: self.narrative.explainability.clone(),
            },
        }
    }
}

/// The scoring engine. Construction runs the configuration-integrity checks
/// on the trait catalog and rule table; a misconfigured table is reported
/// here, never at request time.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        validate_catalog()?;
        validate_rules()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> EngineResult<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline for one intake. The only fallible step is the
    /// intake gate; a valid intake always yields a complete report.
    pub fn produce_report(&self, raw: &RawIntake) -> EngineResult<Report> {
        let record = validate(raw, self.config.max_free_text_len)?;
        let intake_digest = record.digest()?;

        let features = extract(&record);
        let scores: TraitScores = map_traits(&features);
        let hypotheses = narrate(&scores);
        let suggestions = suggest(&scores);
        let explainability = explain(&scores, self.config.explain_top_n);

        tracing::debug!(
            digest = %intake_digest,
            traits = scores.len(),
            hypotheses = hypotheses.len(),
            "report produced"
        );

        Ok(Report {
            engine_version: EngineVersion::current(),
            intake_digest,
            scores,
            narrative: Narrative {
                hypotheses,
                suggestions,
                disclaimer: DISCLAIMER.to_string(),
                explainability,
            },
        })
    }
}
