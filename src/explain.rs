//! Explainability recorder
//!
//! Pure projection of the contributor traces the mapper already produced.
//! Nothing is recomputed here, so the rendered "why" can never drift from
//! the score it explains. Truncation affects presentation only.

use crate::trait_map::{Contributor, TraitScores};
use std::collections::BTreeMap;

/// Default number of contributors rendered per trait.
pub const DEFAULT_TOP_N: usize = 5;

/// Re-expose each trait's contributors, truncated to the top `top_n` by
/// magnitude. The traces are already sorted by the mapper; `top_n == 0` is
/// treated as "no truncation".
pub fn explain(scores: &TraitScores, top_n: usize) -> BTreeMap<String, Vec<Contributor>> {
    scores
        .iter()
        .map(|(name, score)| {
            let take = if top_n == 0 {
                score.contributors.len()
            } else {
                top_n.min(score.contributors.len())
            };
            (name.clone(), score.contributors[..take].to_vec())
        })
        .collect()
}
