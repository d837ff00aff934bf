//! Shade Node
//!
//! Hosts the ledger and staking registry behind a single-writer engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 StakingService (async)               │
//! │        Arc<Mutex<Engine>> · spawn_blocking           │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                        Engine                        │
//! │  Command ──▶ StakingRegistry ──▶ Ledger ──▶ Receipt  │
//! │  sequence numbers · monotonic clock · user decrypt   │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//!                 CipherAlgebra (shade-fhe)
//! ```
//!
//! The dev backend can be persisted with [`snapshot::save`] and restored
//! with [`snapshot::load`].

mod clock;
mod command;
mod config;
mod engine;
mod error;
mod service;
pub mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, Outcome, Receipt};
pub use config::{DeploymentConfig, DEFAULT_OPERATOR_UNTIL};
pub use engine::Engine;
pub use error::{NodeError, NodeResult};
pub use service::StakingService;
pub use snapshot::Snapshot;
