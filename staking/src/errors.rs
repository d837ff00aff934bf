//! Staking Error Types

use shade_fhe::FHEError;
use shade_ledger::{LedgerError, Timestamp};
use thiserror::Error;

/// Errors that can occur in staking operations.
///
/// All of them are precondition failures; none leaves a partial mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("Stake already active")]
    StakeAlreadyActive,

    #[error("Invalid lock duration: {0}")]
    InvalidDuration(u64),

    #[error("No active stake")]
    NoActiveStake,

    #[error("Stake locked until {unlock_time} (now {now})")]
    StakeLocked { unlock_time: Timestamp, now: Timestamp },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<FHEError> for StakingError {
    fn from(err: FHEError) -> Self {
        StakingError::Ledger(LedgerError::Fhe(err))
    }
}

/// Result type for staking operations
pub type StakingResult<T> = Result<T, StakingError>;
