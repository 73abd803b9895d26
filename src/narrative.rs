//! Narrative generator
//!
//! Turns trait scores into an ordered list of hedged hypothesis statements.
//! Rules are a declarative table of `(predicate, template, salience)` rows;
//! adding a hypothesis is a data change. Templates are restricted to
//! hypothesis-framed language and checked for a hedge marker at load time,
//! so the engine cannot emit a diagnostic-sounding claim by construction.

use crate::errors::{EngineError, EngineResult};
use crate::trait_map::{TraitScores, TRAIT_TABLE};
use serde::{Deserialize, Serialize};

/// Threshold comparison over one trait value.
#[derive(Debug, Clone, Copy)]
pub enum Cmp {
    AtLeast(f64),
    Below(f64),
}

/// One conjunct of a rule predicate.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub trait_name: &'static str,
    pub cmp: Cmp,
}

/// One narrative rule. All conditions must hold for the rule to fire.
/// Salience is a fixed integer, never computed from scores, so ordering is
/// reproducible; ties fall back to declaration order in [`RULE_TABLE`].
#[derive(Debug, Clone)]
pub struct HypothesisRule {
    pub id: &'static str,
    pub salience: i32,
    pub conditions: &'static [Condition],
    pub template: &'static str,
}

pub const RULE_TABLE: &[HypothesisRule] = &[
    HypothesisRule {
        id: "precise_and_structured",
        salience: 70,
        conditions: &[
            Condition {
                trait_name: "systems_thinking",
                cmp: Cmp::AtLeast(70.0),
            },
            Condition {
                trait_name: "conscientiousness",
                cmp: Cmp::AtLeast(60.0),
            },
        ],
        template: "Technical precision appears to pair with a preference for structure; \
                   you may do your best work with explicit plans and acceptance criteria.",
    },
    HypothesisRule {
        id: "high_intensity",
        salience: 60,
        conditions: &[Condition {
            trait_name: "intensity",
            cmp: Cmp::AtLeast(65.0),
        }],
        template: "Your engagement signal runs high; when something matters to you, \
                   involvement may go all in.",
    },
    HypothesisRule {
        id: "sensitivity_under_load",
        salience: 55,
        conditions: &[Condition {
            trait_name: "neuroticism",
            cmp: Cmp::AtLeast(65.0),
        }],
        template: "A higher sensitivity signal is present; stress spikes or sensory \
                   overload may be more likely under chaotic conditions.",
    },
    HypothesisRule {
        id: "systems_orientation",
        salience: 50,
        conditions: &[Condition {
            trait_name: "systems_thinking",
            cmp: Cmp::AtLeast(65.0),
        }],
        template: "A strong systems orientation shows in your language; you may prefer \
                   end-to-end plans over vague placeholders.",
    },
    HypothesisRule {
        id: "structured_executor",
        salience: 45,
        conditions: &[Condition {
            trait_name: "conscientiousness",
            cmp: Cmp::AtLeast(65.0),
        }],
        template: "You appear to favor structure and execution; checklists and \
                   automation may feel steadying rather than confining.",
    },
    HypothesisRule {
        id: "idea_connector",
        salience: 40,
        conditions: &[Condition {
            trait_name: "openness",
            cmp: Cmp::AtLeast(65.0),
        }],
        template: "You appear to connect ideas across domains and may enjoy remixing \
                   concepts from unrelated fields.",
    },
    HypothesisRule {
        id: "comfortable_with_ambiguity",
        salience: 35,
        conditions: &[Condition {
            trait_name: "ambiguity_tolerance",
            cmp: Cmp::AtLeast(70.0),
        }],
        template: "Open-ended problems appear comfortable for you; you may be at ease \
                   exploring before requirements settle.",
    },
    HypothesisRule {
        id: "direct_communicator",
        salience: 30,
        conditions: &[Condition {
            trait_name: "agreeableness",
            cmp: Cmp::Below(40.0),
        }],
        template: "Your language leans direct; a one-line warm wrapper may reduce \
                   misreads without blunting the point.",
    },
];

/// Markers every template must contain so statements stay hypothesis-framed.
const HEDGE_MARKERS: [&str; 6] = ["may", "might", "appear", "likely", "could", "tends"];

/// Fixed non-diagnostic disclaimer attached to every narrative.
pub const DISCLAIMER: &str = "This report is a self-reflection aid, not a diagnosis. \
     If you suspect a clinical condition, consult a qualified professional.";

/// One fired hypothesis, with the evidence trail back to raw features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hypothesis {
    pub rule: String,
    pub text: String,
    pub salience: i32,
    /// Traits the predicate tested.
    pub traits: Vec<String>,
    /// Features cited from those traits' contributor traces.
    pub features: Vec<String>,
}

/// Verify the rule table: every referenced trait exists, every template
/// carries a hedge marker, ids are unique. Load-time check only.
pub fn validate_rules() -> EngineResult<()> {
    let mut seen = std::collections::HashSet::new();
    for rule in RULE_TABLE {
        if !seen.insert(rule.id) {
            return Err(EngineError::config(format!("duplicate rule id: {}", rule.id)));
        }
        for cond in rule.conditions {
            if !TRAIT_TABLE.iter().any(|t| t.name == cond.trait_name) {
                return Err(EngineError::config(format!(
                    "rule {} references unknown trait {}",
                    rule.id, cond.trait_name
                )));
            }
        }
        let lower = rule.template.to_lowercase();
        if !HEDGE_MARKERS.iter().any(|m| lower.contains(m)) {
            return Err(EngineError::config(format!(
                "rule {} template is not hypothesis-framed",
                rule.id
            )));
        }
    }
    Ok(())
}

fn condition_holds(cond: &Condition, scores: &TraitScores) -> bool {
    let value = match scores.get(cond.trait_name) {
        Some(score) => score.value,
        None => return false,
    };
    match cond.cmp {
        Cmp::AtLeast(t) => value >= t,
        Cmp::Below(t) => value < t,
    }
}

/// Collect every fired rule, ordered by descending salience with declaration
/// order as the tiebreak. Total and deterministic; may return an empty list.
pub fn narrate(scores: &TraitScores) -> Vec<Hypothesis> {
    let mut fired: Vec<(usize, &HypothesisRule)> = RULE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.conditions.iter().all(|c| condition_holds(c, scores)))
        .collect();

    fired.sort_by(|(ia, a), (ib, b)| b.salience.cmp(&a.salience).then(ia.cmp(ib)));

    fired
        .into_iter()
        .map(|(_, rule)| {
            let traits: Vec<String> = rule
                .conditions
                .iter()
                .map(|c| c.trait_name.to_string())
                .collect();

            // Cite the features that actually moved the traits the predicate
            // tested, in trace order, deduplicated.
            let mut features = Vec::new();
            for cond in rule.conditions {
                if let Some(score) = scores.get(cond.trait_name) {
                    for contributor in &score.contributors {
                        if contributor.contribution != 0.0
                            && !features.contains(&contributor.feature)
                        {
                            features.push(contributor.feature.clone());
                        }
                    }
                }
            }

            Hypothesis {
                rule: rule.id.to_string(),
                text: rule.template.to_string(),
                salience: rule.salience,
                traits,
                features,
            }
        })
        .collect()
}

/// Rule-based suggestions appended to every narrative. The base list is
/// unconditional; the rest key off score thresholds.
pub fn suggest(scores: &TraitScores) -> Vec<String> {
    let mut suggestions = vec![
        "Use a two-pass workflow: wild ideation first, then ruthless reduction into a \
         minimal shippable unit."
            .to_string(),
        "If you feel overwhelmed, reduce inputs: fewer tabs, single-task timers, simple \
         ambient audio."
            .to_string(),
        "When communicating, state the goal, then constraints, then the definition of \
         done."
            .to_string(),
    ];

    let value = |name: &str| scores.get(name).map(|s| s.value).unwrap_or(50.0);

    if value("ambiguity_tolerance") < 45.0 {
        suggestions.push(
            "Ambiguity may feel costly; ask for concrete examples, timelines, and \
             acceptance criteria."
                .to_string(),
        );
    }
    if value("agreeableness") < 45.0 {
        suggestions.push(
            "Directness can be a strength; a short warm opener may reduce misreads."
                .to_string(),
        );
    }
    if value("extraversion") > 60.0 {
        suggestions.push(
            "You may ideate best out loud; voice notes or co-working can amplify output."
                .to_string(),
        );
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trait_map::{Contributor, TraitScore};
    use std::collections::BTreeMap;

    fn scores_with(values: &[(&str, f64)]) -> TraitScores {
        let mut scores = BTreeMap::new();
        for spec in TRAIT_TABLE {
            let value = values
                .iter()
                .find(|(n, _)| *n == spec.name)
                .map(|(_, v)| *v)
                .unwrap_or(50.0);
            scores.insert(
                spec.name.to_string(),
                TraitScore {
                    value,
                    raw: value - 50.0,
                    scale: 1.0,
                    contributors: vec![Contributor {
                        feature: format!("{}_driver", spec.name),
                        value: 1.0,
                        weight: value - 50.0,
                        contribution: value - 50.0,
                    }],
                },
            );
        }
        scores
    }

    #[test]
    fn rule_table_is_internally_consistent() {
        validate_rules().unwrap();
    }

    #[test]
    fn neutral_scores_produce_empty_narrative() {
        let hypotheses = narrate(&scores_with(&[]));
        assert!(hypotheses.is_empty());
    }

    #[test]
    fn ordering_is_salience_then_declaration() {
        let hypotheses = narrate(&scores_with(&[
            ("openness", 80.0),
            ("intensity", 80.0),
            ("systems_thinking", 80.0),
            ("conscientiousness", 80.0),
        ]));
        let ids: Vec<&str> = hypotheses.iter().map(|h| h.rule.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "precise_and_structured",
                "high_intensity",
                "systems_orientation",
                "structured_executor",
                "idea_connector",
            ]
        );
        for pair in hypotheses.windows(2) {
            assert!(pair[0].salience >= pair[1].salience);
        }
    }

    #[test]
    fn conjunctive_predicate_requires_all_conditions() {
        let hypotheses = narrate(&scores_with(&[("systems_thinking", 75.0)]));
        assert!(hypotheses.iter().all(|h| h.rule != "precise_and_structured"));
        assert!(hypotheses.iter().any(|h| h.rule == "systems_orientation"));
    }

    #[test]
    fn hypotheses_cite_contributing_features() {
        let hypotheses = narrate(&scores_with(&[("intensity", 80.0)]));
        let high = hypotheses
            .iter()
            .find(|h| h.rule == "high_intensity")
            .unwrap();
        assert_eq!(high.traits, vec!["intensity".to_string()]);
        assert_eq!(high.features, vec!["intensity_driver".to_string()]);
    }

    #[test]
    fn below_threshold_rules_fire() {
        let hypotheses = narrate(&scores_with(&[("agreeableness", 30.0)]));
        assert!(hypotheses.iter().any(|h| h.rule == "direct_communicator"));
    }

    #[test]
    fn suggestions_track_thresholds() {
        let base = suggest(&scores_with(&[]));
        assert_eq!(base.len(), 3);

        let extra = suggest(&scores_with(&[
            ("ambiguity_tolerance", 30.0),
            ("extraversion", 70.0),
        ]));
        assert_eq!(extra.len(), 5);
    }
}
