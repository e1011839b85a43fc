//! Error types for the core
//!
//! Validation and transport errors never escape the executor; they are folded
//! into [`crate::response::ResponseOutcome::Failure`]. List and store errors are
//! returned to the caller so unknown ids and bad indices stay distinguishable.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::constants::{INVALID_BODY_MESSAGE, INVALID_URL_MESSAGE};

/// Errors raised by [`crate::models::KeyValueList`] index operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Pre-dispatch problems with a descriptor; the request never reaches the network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", INVALID_URL_MESSAGE)]
    InvalidUrl,
    #[error("{}", INVALID_BODY_MESSAGE)]
    InvalidBody,
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Transport-layer failures (DNS, connect, timeout, TLS, body read)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Request failed: {0}")]
    Other(String),
}

/// Errors raised by [`crate::storage::Store`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("environment not found: {0}")]
    EnvironmentNotFound(Uuid),

    #[error("history record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("failed to persist store to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
}

impl StoreError {
    /// True for the unknown-id variants
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::EnvironmentNotFound(_) | StoreError::RecordNotFound(_)
        )
    }
}

/// Underlying cause of a persistence failure
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
