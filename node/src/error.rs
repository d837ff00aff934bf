//! Node errors

use thiserror::Error;

use shade_fhe::CiphertextHandle;
use shade_ledger::Account;

/// Node result type
pub type NodeResult<T> = Result<T, NodeError>;

/// Node errors
#[derive(Error, Debug)]
pub enum NodeError {
    /// Rejected state transition
    #[error("Staking error: {0}")]
    Staking(#[from] shade_staking::StakingError),

    /// Rejected ledger operation
    #[error("Ledger error: {0}")]
    Ledger(#[from] shade_ledger::LedgerError),

    /// Co-processor failure
    #[error("FHE error: {0}")]
    Fhe(#[from] shade_fhe::FHEError),

    /// Requester is not on the handle's ACL
    #[error("{requester} may not decrypt {handle}")]
    AccessDenied {
        requester: Account,
        handle: CiphertextHandle,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background task failed
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<bincode::Error> for NodeError {
    fn from(err: bincode::Error) -> Self {
        NodeError::Serialization(err.to_string())
    }
}
