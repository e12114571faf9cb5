//! Error types for the morris-rl crate

use thiserror::Error;

/// Main error type for the morris-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("no state with name '{name}' exists")]
    UnknownState { name: String },

    #[error("parse error at token {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("invalid graph: {message}")]
    InvalidGraph { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid task layout: {message}")]
    InvalidLayout { message: String },

    #[error("policy at state '{state}' cannot be normalised (weight total {total})")]
    DegeneratePolicy { state: String, total: f64 },

    #[error("trial did not reach the end state within {steps} steps")]
    NonTerminatingTrial { steps: usize },

    #[error("state '{state}' carries tag '{tag}' which names no cue")]
    UnknownCueTag { state: String, tag: String },

    #[error("insufficient data: {what}")]
    InsufficientData { what: String },

    #[error("visit counts disagree for {what}: expected {expected}, children sum to {actual}")]
    VisitCountMismatch {
        what: String,
        expected: u64,
        actual: u64,
    },

    #[error("invalid {kind} '{input}'. Expected one of: {expected}")]
    ParseToken {
        kind: &'static str,
        input: String,
        expected: String,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
