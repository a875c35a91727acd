//! Error types for cluster-state providers.

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while fetching cluster state.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("cluster configuration error: {0}")]
    Config(String),

    #[error("cluster request failed: {0}")]
    Request(String),

    #[error("failed to read snapshot: {0}")]
    Read(String),

    #[error("failed to parse snapshot: {0}")]
    Deserialize(String),
}
