//! Shade: confidential token staking
//!
//! This is the root crate that re-exports all Shade components for
//! integration testing and provides unified access to the ledger, the
//! staking registry and the engine that hosts them.
//!
//! ## Architecture Overview
//!
//! Token balances and stake amounts are ciphertext handles held by an FHE
//! co-processor. Nothing on the state-transition path decrypts:
//!
//! - **Confidential debit**: `applied = select(balance >= amount, amount, 0)`,
//!   so an insufficient balance moves an encrypted zero instead of failing
//! - **Input proofs**: externally encrypted amounts are bound to the account
//!   submitting them and the context receiving them
//! - **Operator grants**: the registry moves a staker's balance only under an
//!   expiring grant issued by that staker
//! - **Time locks**: a stake is withdrawable once `now >= unlock_time`
//!
//! ## Crate Organization
//!
//! - `shade-fhe`: ciphertext handles, homomorphic algebra, encrypted inputs
//! - `shade-ledger`: confidential balances and ciphertext authorization
//! - `shade-staking`: time-locked staking registry
//! - `shade-node`: single-writer engine, async service, snapshots

pub use shade_fhe as fhe;
pub use shade_ledger as ledger;
pub use shade_node as node;
pub use shade_staking as staking;

/// Shade version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use shade_fhe::{
        Address, CipherAlgebra, CiphertextHandle, Decryptor, DevAlgebra, EncryptedInputBuilder,
        InputVerifierKey,
    };
    pub use shade_ledger::{Account, ConfidentialBalanceLedger, LedgerConfig, LedgerError, Timestamp};
    pub use shade_node::{
        Command, DeploymentConfig, Engine, ManualClock, NodeError, Receipt, StakingService,
        DEFAULT_OPERATOR_UNTIL,
    };
    pub use shade_staking::{StakeRecord, StakingError, StakingEvent, StakingRegistry};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
