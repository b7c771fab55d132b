//! Deterministic, seedable workout/training-program generation engine.
//!
//! Two-phase pipeline: structural generation (Phase 1) decides the shape of
//! each day and which exercises fill it, parameterization (Phase 2) computes
//! week-by-week concrete values and progression. Everything is driven by a
//! data file (the rules document) rather than hard-coded tables.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod metadata;
pub mod phase1;
pub mod phase2;
pub mod program;
pub mod questionnaire;
pub mod rng;
pub mod rules;
pub mod validator;
pub mod weight;

pub use catalogue::ExerciseCatalogue;
pub use config::AppConfig;
pub use error::{Result, WorkoutGenError};
pub use generator::{Clock, FixedClock, Generator, SystemClock};
pub use logging::{DiagnosticReport, LogConfig, LogFormat, LogLevel};
pub use metadata::MetadataService;
pub use program::ParameterizedProgram;
pub use questionnaire::Questionnaire;
pub use rules::RulesDocument;
pub use validator::{validate, ValidationIssue, ValidationReport};
