//! Library root for the `insight_atlas` crate
//!
//! A deterministic, explainable scoring engine: one consented intake
//! (Likert survey + free text) in, one reproducible report out. The pipeline
//! is Validator -> Extractor -> Mapper -> (Narrative, Explainability), every
//! stage a pure function over immutable inputs.

// Core error handling
pub mod errors;

// Pipeline stages
pub mod intake;
pub mod lexicon;
pub mod features;
pub mod trait_map;
pub mod narrative;
pub mod explain;

// Engine assembly
pub mod engine;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Web server interface
pub mod atlasweb;


// Re-export the types collaborators touch: the composed entry point and the
// report it produces.
pub use engine::{Engine, EngineConfig, EngineVersion, Report, WireReport};
pub use errors::{EngineError, EngineResult};
pub use intake::{IntakeRecord, RawIntake};
pub use trait_map::{Contributor, TraitScore, TraitScores};
