//! Addresses Command - Show deployed addresses

use clap::Args;

use super::Workspace;

/// Show the ledger and staking registry addresses
#[derive(Args)]
pub struct AddressesCommand {}

impl AddressesCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let config = workspace.config()?;
        let deployment = &config.deployment;

        if workspace.json {
            let out = serde_json::json!({
                "network": config.network,
                "token": deployment.ledger_address,
                "staking": deployment.staking_address,
                "inputContext": deployment.input_context(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        println!("Network:  {}", config.network);
        println!(
            "Token:    {} ({}, {} decimals)",
            deployment.ledger_address, deployment.token.symbol, deployment.token.decimals
        );
        println!("Staking:  {}", deployment.staking_address);
        Ok(())
    }
}
