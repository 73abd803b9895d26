//! End-to-end tests through the public crate surface
//!
//! Exercise the composed engine and the wire shape the reporting collaborator
//! consumes, the way an embedding service would.

use insight_atlas::intake::SURVEY_KEYS;
use insight_atlas::{Engine, EngineConfig, EngineError, RawIntake};
use serde_json::json;
use std::collections::BTreeMap;

fn raw_intake(answers: &[(&str, i64)], free_text: &str) -> RawIntake {
    let mut survey: BTreeMap<String, serde_json::Value> = SURVEY_KEYS
        .iter()
        .map(|k| (k.to_string(), json!(3)))
        .collect();
    for (k, v) in answers {
        survey.insert(k.to_string(), json!(v));
    }
    RawIntake {
        consent: true,
        survey,
        free_text: free_text.to_string(),
    }
}

#[test]
fn wire_report_has_the_contract_shape() {
    let engine = Engine::with_defaults().unwrap();
    let report = engine
        .produce_report(&raw_intake(
            &[("structure_preference", 5)],
            "I deploy the api server with docker. The pipeline schema is very clean.",
        ))
        .unwrap();
    let wire = serde_json::to_value(report.wire()).unwrap();

    let scores = wire["scores"].as_object().unwrap();
    assert_eq!(scores.len(), 8);
    for (name, value) in scores {
        let v = value.as_f64().unwrap();
        assert!((0.0..=100.0).contains(&v), "{name} out of range: {v}");
    }

    for hypothesis in wire["narrative"]["hypotheses"].as_array().unwrap() {
        assert!(hypothesis.is_string());
    }
    for (_, contributors) in wire["narrative"]["explainability"].as_object().unwrap() {
        for entry in contributors.as_array().unwrap() {
            for key in ["feature", "value", "weight", "contribution"] {
                assert!(entry.get(key).is_some(), "missing contributor key {key}");
            }
        }
    }
}

#[test]
fn neutral_intake_yields_an_empty_narrative() {
    // All-3s survey, no free text: there is no evidence to narrate, so no
    // hypothesis may fire and only the unconditional suggestions remain.
    let engine = Engine::with_defaults().unwrap();
    let report = engine.produce_report(&raw_intake(&[], "")).unwrap();

    assert!(
        report.narrative.hypotheses.is_empty(),
        "neutral intake fired: {:?}",
        report
            .narrative
            .hypotheses
            .iter()
            .map(|h| h.rule.as_str())
            .collect::<Vec<_>>()
    );
    assert_eq!(report.narrative.suggestions.len(), 3);
    for (name, score) in &report.scores {
        assert!(
            score.value < 65.0,
            "neutral {name} crosses a rule threshold: {}",
            score.value
        );
    }
}

#[test]
fn reports_are_deterministic_across_engine_instances() {
    let raw = raw_intake(&[("novelty_seeking", 5)], "A poetic, dreamy metaphor. Maybe!");
    let a = Engine::with_defaults().unwrap().produce_report(&raw).unwrap();
    let b = Engine::with_defaults().unwrap().produce_report(&raw).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn free_text_limit_is_configurable_and_hard() {
    let engine = Engine::new(EngineConfig {
        max_free_text_len: 10,
        ..Default::default()
    })
    .unwrap();

    let err = engine
        .produce_report(&raw_intake(&[], "twelve chars"))
        .unwrap_err();
    assert!(matches!(err, EngineError::FreeTextTooLong { max: 10, .. }));

    // At the limit the text is analyzed, never truncated
    let report = engine.produce_report(&raw_intake(&[], "ten chars.")).unwrap();
    assert_eq!(report.scores.len(), 8);
}

#[test]
fn incomplete_survey_is_rejected_with_the_missing_keys() {
    let engine = Engine::with_defaults().unwrap();
    let mut raw = raw_intake(&[], "");
    raw.survey.remove("hyperfocus");
    raw.survey.remove("social_energy");

    match engine.produce_report(&raw).unwrap_err() {
        EngineError::SurveyIncomplete { missing } => {
            assert_eq!(missing, vec!["social_energy".to_string(), "hyperfocus".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn hedged_language_only_in_hypotheses() {
    let engine = Engine::with_defaults().unwrap();
    let report = engine
        .produce_report(&raw_intake(
            &[("hyperfocus", 5), ("sensory_sensitivity", 5)],
            "I am very very anxious and extremely worried. I hate chaos, definitely. \
             Everything is so absolutely loud!",
        ))
        .unwrap();

    assert!(!report.narrative.hypotheses.is_empty());
    for hypothesis in &report.narrative.hypotheses {
        let lower = hypothesis.text.to_lowercase();
        assert!(
            ["may", "might", "appear", "likely", "could", "tends"]
                .iter()
                .any(|m| lower.contains(m)),
            "unhedged hypothesis: {}",
            hypothesis.text
        );
    }
}
