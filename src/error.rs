//! Error types surfaced by the engine.
//!
//! Insufficient data, tie votes and an unavailable advisory are normal
//! results, not errors. Only malformed input and bad tuning fail.

use thiserror::Error;

/// Rejected prediction input. Raised before the confidence gate runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("prediction from '{agent_id}' has confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { agent_id: String, confidence: f64 },

    #[error("prediction from '{agent_id}' has invalid {field} level {value}")]
    InvalidPriceLevel {
        agent_id: String,
        field: &'static str,
        value: f64,
    },

    #[error("prediction is missing an agent id")]
    MissingAgentId,

    #[error("unknown agent category '{0}'")]
    UnknownCategory(String),

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),
}

/// Rejected engine tuning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Why one asset in a batch produced no result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("evaluation task failed: {0}")]
    TaskFailed(String),
}

/// Top-level error for callers that drive the engine end to end.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to decode request: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
