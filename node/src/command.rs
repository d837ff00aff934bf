//! Commands accepted by the engine and their receipts

use serde::{Deserialize, Serialize};
use shade_fhe::{CiphertextHandle, EncryptedInputProof};
use shade_ledger::{Account, Timestamp};
use shade_staking::StakingEvent;

/// State-changing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Mint {
        caller: Account,
        to: Account,
        amount: u64,
    },
    SetOperator {
        owner: Account,
        spender: Account,
        until: Timestamp,
    },
    Stake {
        account: Account,
        encrypted_amount: CiphertextHandle,
        proof: EncryptedInputProof,
        lock_duration: u64,
    },
    Withdraw {
        account: Account,
    },
}

impl Command {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Mint { .. } => "mint",
            Command::SetOperator { .. } => "set_operator",
            Command::Stake { .. } => "stake",
            Command::Withdraw { .. } => "withdraw",
        }
    }
}

/// Effect of an applied command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Minted {
        to: Account,
        balance: CiphertextHandle,
    },
    OperatorSet {
        owner: Account,
        spender: Account,
        until: Timestamp,
    },
    Staking(StakingEvent),
}

/// Record of an applied command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position in the total order of applied commands, starting at 1
    pub sequence: u64,
    /// Engine time the command was applied at
    pub timestamp: Timestamp,
    pub outcome: Outcome,
}

impl Receipt {
    /// Staking event carried by the receipt, if any
    pub fn event(&self) -> Option<&StakingEvent> {
        match &self.outcome {
            Outcome::Staking(event) => Some(event),
            _ => None,
        }
    }
}
