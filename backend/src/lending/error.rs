//! Lending environment errors

use crate::config::ConfigError;
use crate::models::customer::CustomerPoolError;
use thiserror::Error;

/// Errors surfaced by [`crate::lending::LendingEnvironment`]
///
/// The monthly dynamics themselves never fail; these cover construction
/// and protocol misuse only.
#[derive(Debug, Error, PartialEq)]
pub enum LendingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Invalid customer pool: {0}")]
    InvalidPool(#[from] CustomerPoolError),

    #[error("Action must have {expected} components, got {actual}")]
    InvalidAction { expected: usize, actual: usize },

    #[error("Episode has finished; call reset() before stepping again")]
    EpisodeFinished,

    #[error("Environment has not been reset")]
    NotReset,

    #[error("Snapshot config hash mismatch: expected {expected}, got {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LendingError {
    fn from(err: serde_json::Error) -> Self {
        LendingError::Serialization(err.to_string())
    }
}
