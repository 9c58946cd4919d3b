use std::time::Duration;

use thiserror::Error;

/// Failure of a single profile-collaborator call.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no profile data returned for @{handle}")]
    NoData { handle: String },

    #[error("{operation} timed out after {limit:?}")]
    Timeout { operation: String, limit: Duration },

    #[error("malformed provider payload: {0}")]
    Payload(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("refusing to look up invalid handle {0:?}")]
    InvalidHandle(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} conflict: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative generation failed: {0}")]
    Generation(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("profile source error: {0}")]
    Source(#[from] SourceError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] brandaudit_core::CoreError),

    #[error("invalid brand handle: {0:?}")]
    InvalidHandle(String),
}

impl PipelineError {
    /// `true` when a referenced audit, brand, or influencer does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, PipelineError::Store(StoreError::NotFound { .. }))
    }
}
