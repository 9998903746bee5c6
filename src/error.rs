//! Error types for the flow engine.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Lead capture error: {0}")]
    Capture(#[from] CaptureError),
}

/// Flow-configuration errors, raised at construction time.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Flow has no questions")]
    NoQuestions,

    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("Choice question {id} has no options")]
    NoOptions { id: String },

    #[error("Question {id} has min {min} greater than max {max}")]
    InvalidBounds { id: String, min: i64, max: i64 },

    #[error("Unknown question id: {0}")]
    UnknownQuestion(String),
}

/// Submit-time answer validation failures.
///
/// These are recoverable: the input control stays active and session state
/// is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{value:?} is not one of the configured options")]
    NotAnOption { value: String },

    #[error("Value does not parse as an integer: {0}")]
    NotAnInteger(String),

    #[error("{value} is below the minimum of {min}")]
    BelowMinimum { value: i64, min: i64 },

    #[error("Answer is empty")]
    EmptyText,

    #[error("{0:?} is not a valid email address")]
    InvalidEmail(String),

    #[error("Answer type does not match the question kind")]
    KindMismatch,
}

/// Persistence-surface errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Lead-capture submission errors. Surfaced to the user as a generic inline
/// message; never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Invalid capture endpoint: {0}")]
    Endpoint(String),

    #[error("Submission request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Submission rejected with status {0}")]
    Status(u16),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
