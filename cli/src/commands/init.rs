//! Init Command - Deploy a new ledger and staking registry

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use shade_fhe::DevAlgebra;
use shade_node::{snapshot, Engine, SystemClock};
use tracing::info;

use crate::config::{default_config_path, default_data_dir, default_state_path, ShadeConfig};

/// Deploy a new ledger and staking registry
#[derive(Args)]
pub struct InitCommand {
    /// Force overwrite existing deployment
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    pub async fn execute(
        self,
        network: &str,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let explicit_dir = data_dir.is_some();
        let data_dir = data_dir.unwrap_or_else(|| default_data_dir(network));
        let config_path = config_path.unwrap_or_else(|| default_config_path(&data_dir));
        let state_path = default_state_path(&data_dir);

        info!("Initializing Shade deployment for {} network", network);
        info!("Data directory: {}", data_dir.display());

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Deployment already initialized at {}. Use --force to overwrite.",
                data_dir.display()
            );
        }

        let config = ShadeConfig::for_network(network)?;
        config.save(&config_path)?;
        info!("Configuration saved to {}", config_path.display());

        let engine = Engine::new(config.deployment.clone(), DevAlgebra::new(), Arc::new(SystemClock));
        snapshot::save(&engine, &state_path)?;

        let deployment = &config.deployment;
        println!("{} deployed at: {}", deployment.token.name, deployment.ledger_address);
        println!("ConfidentialStaking deployed at: {}", deployment.staking_address);
        println!();
        println!("Configuration: {}", config_path.display());
        println!("State:         {}", state_path.display());
        if explicit_dir {
            println!();
            println!("Pass --data-dir {} to later commands", data_dir.display());
        } else if network != "local" {
            println!();
            println!("Pass --network {} (or set SHADE_NETWORK) to later commands", network);
        }

        Ok(())
    }
}
