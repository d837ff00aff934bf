//! CLI Commands

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use shade_fhe::DevAlgebra;
use shade_node::{snapshot, Receipt, StakingService, SystemClock};

use crate::config::{default_config_path, default_data_dir, default_state_path, ShadeConfig};

mod addresses;
mod init;
mod ledger;
mod staking;

pub use addresses::AddressesCommand;
pub use init::InitCommand;
pub use ledger::{BalanceCommand, MintCommand, SetOperatorCommand};
pub use staking::{StakeCommand, StakeInfoCommand, WithdrawCommand};

/// Where a deployment lives on disk, and how results are printed
pub struct Workspace {
    pub data_dir: PathBuf,
    pub config_path: PathBuf,
    pub json: bool,
}

impl Workspace {
    /// An explicit `data_dir` wins over the network's default directory
    pub fn locate(config: Option<PathBuf>, data_dir: Option<PathBuf>, network: &str, json: bool) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| default_data_dir(network));
        let config_path = config.unwrap_or_else(|| default_config_path(&data_dir));
        Self {
            data_dir,
            config_path,
            json,
        }
    }

    pub fn state_path(&self) -> PathBuf {
        default_state_path(&self.data_dir)
    }

    pub fn config(&self) -> anyhow::Result<ShadeConfig> {
        ShadeConfig::load(&self.config_path)
            .with_context(|| format!("No deployment found; run `shade init --data-dir {}`", self.data_dir.display()))
    }

    /// Load configuration and the engine behind it
    pub fn open(&self) -> anyhow::Result<(ShadeConfig, StakingService<DevAlgebra>)> {
        let config = self.config()?;
        let engine = snapshot::load(
            &self.state_path(),
            config.deployment.clone(),
            Arc::new(SystemClock),
        )
        .with_context(|| format!("Failed to load state from {}", self.state_path().display()))?;
        Ok((config, StakingService::new(engine)))
    }

    pub fn persist(&self, service: &StakingService<DevAlgebra>) -> anyhow::Result<()> {
        let path = self.state_path();
        service.with(|engine| snapshot::save(engine, &path))?;
        Ok(())
    }

    /// Print a receipt as JSON, or `summary` followed by its position
    pub fn print_receipt(&self, receipt: &Receipt, summary: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(receipt)?);
        } else {
            println!("{}", summary);
            println!("  sequence:  {}", receipt.sequence);
            println!("  timestamp: {}", receipt.timestamp);
        }
        Ok(())
    }
}
