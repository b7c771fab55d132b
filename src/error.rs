//! Unified error hierarchy for the workout generation engine.
//!
//! Provides a comprehensive error type system with structured error
//! information and integration with the tracing system.

use thiserror::Error;

/// Top-level error type for all generation operations.
#[derive(Debug, Error)]
pub enum WorkoutGenError {
    /// Rules document or catalogue failed to load or validate.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A structural exercise referenced a name absent from the catalogue.
    #[error("exercise '{name}' (day {day}, block {block_type}) is not in the catalogue")]
    CatalogueReference {
        day: u8,
        block_type: String,
        name: String,
    },

    /// A block required more exercises than the filtered candidate pool held.
    #[error(
        "could not fill '{block_type}' block for focus '{focus}': pool had {pool_size}, filters applied: {filters_applied}"
    )]
    ExhaustedPool {
        focus: String,
        block_type: String,
        pool_size: usize,
        filters_applied: String,
    },

    /// A compound block could not be built from enough distinct constituents.
    #[error("compound block '{kind}' needs at least 2 constituents, found {valid_found}")]
    InsufficientConstituents { kind: String, valid_found: usize },

    /// A day's final exercise count fell below `exercise_count_constraints.min_per_day`.
    #[error("day {day} ('{focus}') has {found} exercises, below the configured minimum of {minimum}")]
    TooFewExercises {
        day: u8,
        focus: String,
        found: usize,
        minimum: usize,
    },

    /// The assembled program failed structural validation.
    #[error("generated program failed validation: {0:?}")]
    Validation(Vec<crate::validator::ValidationIssue>),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, WorkoutGenError>;

impl WorkoutGenError {
    /// Get error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WorkoutGenError::Configuration(_) => ErrorSeverity::Critical,
            WorkoutGenError::CatalogueReference { .. } => ErrorSeverity::Error,
            WorkoutGenError::ExhaustedPool { .. } => ErrorSeverity::Error,
            WorkoutGenError::InsufficientConstituents { .. } => ErrorSeverity::Warning,
            WorkoutGenError::TooFewExercises { .. } => ErrorSeverity::Error,
            WorkoutGenError::Validation(_) => ErrorSeverity::Error,
            WorkoutGenError::Io(_) => ErrorSeverity::Error,
            WorkoutGenError::Json(_) => ErrorSeverity::Error,
        }
    }

    /// Get a user-friendly error message suitable for surfacing in a
    /// collaborator UI ("unable to generate program, report this
    /// configuration").
    pub fn user_message(&self) -> String {
        match self {
            WorkoutGenError::Configuration(key) => {
                format!("Unable to generate program: missing or invalid configuration at '{}'.", key)
            }
            WorkoutGenError::ExhaustedPool { focus, .. } => {
                format!(
                    "Unable to generate program: ran out of exercises for the '{}' day. Try a different equipment profile.",
                    focus
                )
            }
            _ => "Unable to generate program, please report this configuration.".to_string(),
        }
    }
}

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention.
    Critical,
    /// Error that prevents operation but the process can continue.
    Error,
    /// Warning that doesn't prevent operation.
    Warning,
    /// Informational message.
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level.
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
