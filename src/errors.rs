//! Unified error types for the view-model core.

use thiserror::Error;

/// Which reference collection a row failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A `unit_id` with no matching unit
    Unit,
    /// An `ingredient_id` with no matching ingredient
    Ingredient,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => f.write_str("unit"),
            Self::Ingredient => f.write_str("ingredient"),
        }
    }
}

/// Errors raised by the view-model core
#[derive(Debug, Error)]
pub enum Error {
    /// A row's unit or ingredient id did not resolve
    #[error("Missing {kind} {id} referenced by row {row_id}")]
    MissingReference {
        /// Id of the row being enriched
        row_id: i64,
        /// Collection the lookup missed
        kind: ReferenceKind,
        /// The id that did not resolve
        id: i64,
    },

    /// The page snapshot could not be parsed
    #[error("Malformed snapshot: {message}")]
    MalformedSnapshot {
        /// Parser message
        message: String,
    },

    /// Settings or command line are invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// The page stopped listening for notifications
    #[error("Notification subscription is closed")]
    SubscriptionClosed,

    /// Reading a file or stdin failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable was not valid unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedSnapshot {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
