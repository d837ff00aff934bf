//! Shade Confidential Ledger
//!
//! Per-account ciphertext balances plus the authorization layer that guards
//! them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            ConfidentialBalanceLedger                │
//! │  mint · debit (ge + select + sub) · credit          │
//! │                      │                              │
//! │                      ▼                              │
//! │            CiphertextAuthorization                  │
//! │  input proofs · operator grants · handle ACL        │
//! └──────────────────────┬──────────────────────────────┘
//!                        ▼
//!               CipherAlgebra (shade-fhe)
//! ```

pub mod authorization;
pub mod errors;
pub mod ledger;
pub mod token;

pub use authorization::{AuthorizationState, CiphertextAuthorization};
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{ConfidentialBalanceLedger, LedgerConfig, LedgerState};
pub use token::TokenMetadata;

/// Account identity
pub type Account = shade_fhe::Address;

/// Seconds since the Unix epoch
pub type Timestamp = u64;
