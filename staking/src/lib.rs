//! Shade Confidential Staking
//!
//! Time-locked staking of encrypted token amounts.
//!
//! Per account the registry is a two-state machine:
//!
//! ```text
//!            stake (duration > 0, valid proof, operator grant)
//!   NoStake ───────────────────────────────────────────────▶ Staked
//!      ▲                                                       │
//!      └───────────────── withdraw (now >= unlock) ────────────┘
//! ```
//!
//! Stake amounts never appear in plaintext: the recorded amount is whatever
//! the ledger's encrypted debit actually moved.

pub mod errors;
pub mod events;
pub mod registry;

pub use errors::{StakingError, StakingResult};
pub use events::StakingEvent;
pub use registry::{RegistryState, StakeRecord, StakingConfig, StakingRegistry};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::errors::StakingError;
    pub use crate::events::StakingEvent;
    pub use crate::registry::{StakeRecord, StakingConfig, StakingRegistry};
}
