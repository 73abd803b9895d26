//! Fixed, versioned word lists used by feature extraction
//!
//! Matching is case-insensitive exact-token lookup only. No stemming and no
//! fuzzy matching: every lexicon hit must be reproducible and auditable from
//! the token itself. Any change to these lists must bump [`LEXICON_VERSION`],
//! which is pinned into every report.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Version identifier for the word lists below.
pub const LEXICON_VERSION: &str = "lex-v1";

lazy_static! {
    /// Tokens that amplify a statement.
    pub static ref INTENSIFIERS: HashSet<&'static str> = [
        "very",
        "really",
        "absolutely",
        "totally",
        "insanely",
        "extremely",
        "super",
        "so",
        "critically",
        "definitely",
        "incredibly",
        "utterly",
    ]
    .into_iter()
    .collect();

    /// Tokens that hedge or soften a statement.
    pub static ref HEDGES: HashSet<&'static str> = [
        "maybe",
        "might",
        "could",
        "perhaps",
        "likely",
        "possibly",
        "somewhat",
        "arguably",
    ]
    .into_iter()
    .collect();

    /// Tokens that express certainty or absolutes.
    pub static ref CERTAINTY: HashSet<&'static str> = [
        "always",
        "never",
        "must",
        "certain",
        "obviously",
        "undeniably",
        "guaranteed",
    ]
    .into_iter()
    .collect();

    /// Emotion-laden tokens.
    pub static ref EMOTION: HashSet<&'static str> = [
        "love",
        "hate",
        "fear",
        "hope",
        "excited",
        "anxious",
        "calm",
        "thrilled",
        "worried",
    ]
    .into_iter()
    .collect();

    /// Technical-domain tokens.
    pub static ref TECHNICAL: HashSet<&'static str> = [
        "api",
        "cli",
        "github",
        "json",
        "yaml",
        "docker",
        "deploy",
        "auth",
        "server",
        "database",
        "compiler",
        "pipeline",
        "schema",
        "latency",
    ]
    .into_iter()
    .collect();

    /// Creative/aesthetic tokens.
    pub static ref CREATIVE: HashSet<&'static str> = [
        "poetic",
        "metaphor",
        "vibe",
        "aesthetic",
        "dreamy",
        "mythic",
        "lyrical",
        "surreal",
    ]
    .into_iter()
    .collect();

    /// First-person singular tokens. Contracted forms are single tokens
    /// because the tokenizer keeps apostrophes inside a word.
    pub static ref FIRST_PERSON: HashSet<&'static str> = [
        "i",
        "me",
        "my",
        "mine",
        "myself",
        "i'm",
        "i've",
        "i'd",
        "i'll",
    ]
    .into_iter()
    .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensifiers_cover_common_amplifiers() {
        for word in ["extremely", "very", "critically", "definitely"] {
            assert!(INTENSIFIERS.contains(word), "missing intensifier: {word}");
        }
    }

    #[test]
    fn lexicons_are_lowercase() {
        let all = INTENSIFIERS
            .iter()
            .chain(HEDGES.iter())
            .chain(CERTAINTY.iter())
            .chain(EMOTION.iter())
            .chain(TECHNICAL.iter())
            .chain(CREATIVE.iter())
            .chain(FIRST_PERSON.iter());
        for word in all {
            assert_eq!(*word, word.to_lowercase());
        }
    }
}
