//! Engine state snapshots
//!
//! The dev backend keeps every ciphertext in memory, so a snapshot holds the
//! co-processor store alongside ledger and registry state. Written with
//! bincode to a temporary file and renamed into place.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shade_fhe::{DevAlgebra, DevStore};
use shade_ledger::{Account, ConfidentialBalanceLedger, LedgerState, Timestamp};
use shade_staking::{RegistryState, StakingRegistry};
use tracing::info;

use crate::clock::Clock;
use crate::config::DeploymentConfig;
use crate::engine::Engine;
use crate::error::{NodeError, NodeResult};

/// Serialized form of an `Engine<DevAlgebra>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Deployment the state belongs to
    pub ledger_address: Account,
    pub staking_address: Account,
    pub sequence: u64,
    pub last_now: Timestamp,
    pub ledger: LedgerState,
    pub registry: RegistryState,
    pub store: DevStore,
}

impl Snapshot {
    pub fn capture(engine: &Engine<DevAlgebra>) -> Self {
        Self {
            ledger_address: engine.deployment.ledger_address,
            staking_address: engine.deployment.staking_address,
            sequence: engine.sequence,
            last_now: engine.last_now,
            ledger: engine.ledger.state(),
            registry: engine.registry.state(),
            store: engine.algebra.store(),
        }
    }

    /// Rebuild an engine. Fails if the snapshot was taken under another deployment.
    pub fn restore(self, deployment: DeploymentConfig, clock: Arc<dyn Clock>) -> NodeResult<Engine<DevAlgebra>> {
        if self.ledger_address != deployment.ledger_address
            || self.staking_address != deployment.staking_address
        {
            return Err(NodeError::Config(format!(
                "snapshot belongs to ledger {} / staking {}",
                self.ledger_address, self.staking_address
            )));
        }

        let ledger = ConfidentialBalanceLedger::from_state(deployment.ledger_config(), self.ledger);
        let registry = StakingRegistry::from_state(deployment.staking_config(&ledger), self.registry);
        let algebra = DevAlgebra::from_store(self.store);

        Ok(Engine::from_parts(
            deployment,
            algebra,
            ledger,
            registry,
            clock,
            self.sequence,
            self.last_now,
        ))
    }
}

/// Write `engine` to `path`
pub fn save(engine: &Engine<DevAlgebra>, path: &Path) -> NodeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = bincode::serialize(&Snapshot::capture(engine))?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;

    info!(path = %path.display(), sequence = engine.sequence(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Read an engine back from `path`
pub fn load(path: &Path, deployment: DeploymentConfig, clock: Arc<dyn Clock>) -> NodeResult<Engine<DevAlgebra>> {
    let bytes = fs::read(path)?;
    let snapshot: Snapshot = bincode::deserialize(&bytes)?;
    let engine = snapshot.restore(deployment, clock)?;

    info!(path = %path.display(), sequence = engine.sequence(), "snapshot loaded");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::command::Command;
    use crate::config::DEFAULT_OPERATOR_UNTIL;
    use shade_fhe::Address;
    use tempfile::TempDir;

    fn staked_engine(clock: &ManualClock) -> Engine<DevAlgebra> {
        let mut engine = Engine::new(DeploymentConfig::local(), DevAlgebra::new(), Arc::new(clock.clone()));
        let alice = Address::derive("alice");
        let staking = engine.deployment().staking_address;

        engine
            .apply(Command::Mint { caller: alice, to: alice, amount: 1_000 })
            .unwrap();
        engine
            .apply(Command::SetOperator { owner: alice, spender: staking, until: DEFAULT_OPERATOR_UNTIL })
            .unwrap();
        let input = engine.encrypt_input(alice, 400).unwrap();
        engine
            .apply(Command::Stake {
                account: alice,
                encrypted_amount: input.handles[0],
                proof: input.proof,
                lock_duration: 30,
            })
            .unwrap();
        engine
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.bin");
        let clock = ManualClock::new(1_000);
        let alice = Address::derive("alice");

        let engine = staked_engine(&clock);
        save(&engine, &path).unwrap();

        let mut restored = load(&path, DeploymentConfig::local(), Arc::new(clock.clone())).unwrap();
        assert_eq!(restored.sequence(), 3);
        assert_eq!(restored.decrypt_balance(&alice).unwrap(), 600);
        assert_eq!(restored.decrypt_stake(&alice).unwrap(), 400);
        assert_eq!(restored.get_stake(&alice).unlock_time, 1_030);

        // Restored engine continues the sequence
        clock.advance(30);
        let receipt = restored.apply(Command::Withdraw { account: alice }).unwrap();
        assert_eq!(receipt.sequence, 4);
        assert_eq!(restored.decrypt_balance(&alice).unwrap(), 1_000);
    }

    #[test]
    fn test_restore_rejects_other_deployment() {
        let clock = ManualClock::new(0);
        let snapshot = Snapshot::capture(&staked_engine(&clock));

        let other = DeploymentConfig::generate("elsewhere");
        let result = snapshot.restore(other, Arc::new(clock));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("absent.bin"), DeploymentConfig::local(), Arc::new(ManualClock::new(0)));
        assert!(matches!(result, Err(NodeError::Io(_))));
    }
}
