use thiserror::Error;

use super::Capability;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Unknown stat type: {0}")]
    UnknownStatType(String),

    #[error("Stat type registered twice: {0}")]
    DuplicateStatType(String),

    #[error("Stat type {stat_type} is not {capability}")]
    CapabilityUnavailable {
        stat_type: String,
        capability: Capability,
    },

    #[error("Malformed {stat_type} record: {message}")]
    MalformedRecord { stat_type: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}
