//! Intake validation gate
//!
//! The only stage of the pipeline that can fail at request time. Everything
//! downstream of [`validate`] operates on an [`IntakeRecord`] and is total.

use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// The fixed survey key set. Every key must be answered; unrecognized keys in
/// the payload are ignored rather than rejected, since they can never become
/// features.
pub const SURVEY_KEYS: [&str; 5] = [
    "novelty_seeking",
    "structure_preference",
    "social_energy",
    "sensory_sensitivity",
    "hyperfocus",
];

/// Default hard limit on free-text length, in characters. A hard rejection,
/// not a truncation: silently dropping text would skew every rate feature.
pub const DEFAULT_MAX_FREE_TEXT: usize = 20_000;

/// Raw intake payload as submitted by the collaborator.
///
/// Survey values arrive as arbitrary JSON so that fractional or non-numeric
/// answers can be rejected explicitly instead of failing opaque
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIntake {
    #[serde(default)]
    pub consent: bool,
    #[serde(default)]
    pub survey: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub free_text: String,
}

/// A validated, immutable intake. Construction goes through [`validate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntakeRecord {
    pub survey: BTreeMap<String, u8>,
    pub free_text: String,
}

impl IntakeRecord {
    /// SHA-256 digest of the canonical JSON form of this record. Key order is
    /// fixed by the `BTreeMap`, so equal intakes always digest identically;
    /// this is the memoization key promised to callers.
    pub fn digest(&self) -> EngineResult<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| EngineError::serialization("intake digest", e))?;
        let hash = Sha256::digest(&bytes);
        Ok(format!("{hash:x}"))
    }
}

/// Validate a raw intake payload.
///
/// Checks, in order: consent, survey completeness, survey value range
/// (integers only; fractional values are rejected, never rounded), free-text
/// length. Pure gate with no side effects.
pub fn validate(raw: &RawIntake, max_free_text: usize) -> EngineResult<IntakeRecord> {
    if !raw.consent {
        return Err(EngineError::ConsentMissing);
    }

    let missing: Vec<String> = SURVEY_KEYS
        .iter()
        .filter(|k| !raw.survey.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::SurveyIncomplete { missing });
    }

    let mut survey = BTreeMap::new();
    for key in SURVEY_KEYS {
        let value = &raw.survey[key];
        let answer = value
            .as_i64()
            .filter(|v| (1..=5).contains(v))
            .ok_or_else(|| EngineError::SurveyOutOfRange {
                key: key.to_string(),
                value: value.clone(),
            })?;
        survey.insert(key.to_string(), answer as u8);
    }

    let len = raw.free_text.chars().count();
    if len > max_free_text {
        return Err(EngineError::FreeTextTooLong {
            len,
            max: max_free_text,
        });
    }

    Ok(IntakeRecord {
        survey,
        free_text: raw.free_text.clone(),
    })
}
