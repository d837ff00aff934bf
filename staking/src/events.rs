//! Staking events

use serde::{Deserialize, Serialize};
use shade_fhe::CiphertextHandle;
use shade_ledger::{Account, Timestamp};

/// Emitted by successful state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingEvent {
    Staked {
        account: Account,
        amount: CiphertextHandle,
        unlock_time: Timestamp,
    },
    Withdrawn {
        account: Account,
        amount: CiphertextHandle,
    },
}

impl StakingEvent {
    pub fn account(&self) -> &Account {
        match self {
            StakingEvent::Staked { account, .. } | StakingEvent::Withdrawn { account, .. } => account,
        }
    }

    pub fn amount(&self) -> &CiphertextHandle {
        match self {
            StakingEvent::Staked { amount, .. } | StakingEvent::Withdrawn { amount, .. } => amount,
        }
    }
}
