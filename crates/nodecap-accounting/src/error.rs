//! Accounting error types.

use nodecap_provider::ProviderError;
use thiserror::Error;

/// Errors that abort a reporting cycle.
#[derive(Debug, Error)]
pub enum AccountingError {
    #[error("failed to list nodes: {0}")]
    ListNodes(ProviderError),

    #[error("failed to list workloads: {0}")]
    ListWorkloads(ProviderError),
}

pub type AccountingResult<T> = Result<T, AccountingError>;
