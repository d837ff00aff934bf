//! Ledger Error Types

use shade_fhe::FHEError;
use thiserror::Error;

use crate::Account;

/// Errors that can occur in ledger operations.
///
/// Every variant is raised before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Encrypted input is not bound to the submitter and context
    #[error("Invalid input proof: {0}")]
    InvalidProof(String),

    /// Caller is neither the owner nor a live operator of the owner
    #[error("{spender} is not authorized to move funds of {owner}")]
    AuthorizationError { owner: Account, spender: Account },

    /// Co-processor failure
    #[error("FHE operation failed: {0}")]
    Fhe(#[from] FHEError),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
