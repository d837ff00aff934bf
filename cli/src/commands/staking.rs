//! Staking Commands - Stake, withdraw and inspect stakes

use clap::Args;
use shade_fhe::DevAlgebra;
use shade_ledger::Account;
use shade_node::{Command, NodeResult, StakingService, DEFAULT_OPERATOR_UNTIL};
use tracing::info;

use super::Workspace;

/// Lock an encrypted amount in the staking registry
#[derive(Args)]
pub struct StakeCommand {
    /// Staking account
    #[arg(long)]
    account: Account,

    /// Amount in base units
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    amount: u64,

    /// Lock duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    lock: u64,
}

impl StakeCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let (config, service) = workspace.open()?;
        let staking = config.deployment.staking_address;

        service
            .submit(Command::SetOperator {
                owner: self.account,
                spender: staking,
                until: DEFAULT_OPERATOR_UNTIL,
            })
            .await?;
        info!(account = %self.account, %staking, "operator granted");

        let input = service.encrypt_input(self.account, self.amount).await?;
        let encrypted_amount = input
            .handles
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Encrypted input produced no handle"))?;

        let receipt = service
            .submit(Command::Stake {
                account: self.account,
                encrypted_amount,
                proof: input.proof,
                lock_duration: self.lock,
            })
            .await?;
        workspace.persist(&service)?;

        let unlock_time = service.get_stake(&self.account).unlock_time;
        workspace.print_receipt(
            &receipt,
            &format!("Staked for {} until {}", self.account, unlock_time),
        )
    }
}

/// Withdraw an unlocked stake
#[derive(Args)]
pub struct WithdrawCommand {
    #[arg(long)]
    account: Account,
}

impl WithdrawCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let (_, service) = workspace.open()?;

        let receipt = service
            .submit(Command::Withdraw { account: self.account })
            .await?;
        workspace.persist(&service)?;

        workspace.print_receipt(&receipt, &format!("Withdrawn for {}", self.account))
    }
}

/// Show and decrypt an account's stake
#[derive(Args)]
pub struct StakeInfoCommand {
    #[arg(long)]
    account: Account,
}

impl StakeInfoCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let (config, service) = workspace.open()?;
        let record = service.get_stake(&self.account);
        let token = &config.deployment.token;

        let amount = decrypt_active_stake(&service, self.account).await?;

        if workspace.json {
            let out = serde_json::json!({
                "account": self.account,
                "active": record.active,
                "unlockTime": record.unlock_time,
                "handle": record.amount.filter(|_| record.active),
                "amount": amount,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        let Some(amount) = amount else {
            println!("No active stake for {}", self.account);
            return Ok(());
        };

        println!("Account:     {}", self.account);
        println!("Unlock time: {}", record.unlock_time);
        println!("Amount:      {} {} ({} base units)", token.format_units(amount), token.symbol, amount);
        Ok(())
    }
}

/// Decrypted stake amount, or `None` without decrypting when nothing is staked
async fn decrypt_active_stake(service: &StakingService<DevAlgebra>, account: Account) -> NodeResult<Option<u64>> {
    if !service.has_active_stake(&account) {
        return Ok(None);
    }
    service.decrypt_stake(account).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_fhe::Address;
    use shade_node::{DeploymentConfig, Engine, ManualClock};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_inactive_stake_is_not_decrypted() {
        let clock = ManualClock::new(100);
        let service = StakingService::new(Engine::new(
            DeploymentConfig::local(),
            DevAlgebra::new(),
            Arc::new(clock.clone()),
        ));
        let alice = Address::derive("alice");
        let staking = service.with(|engine| engine.deployment().staking_address);

        assert_eq!(decrypt_active_stake(&service, alice).await.unwrap(), None);

        service
            .submit(Command::Mint { caller: alice, to: alice, amount: 50 })
            .await
            .unwrap();
        service
            .submit(Command::SetOperator { owner: alice, spender: staking, until: DEFAULT_OPERATOR_UNTIL })
            .await
            .unwrap();
        let input = service.encrypt_input(alice, 20).await.unwrap();
        service
            .submit(Command::Stake {
                account: alice,
                encrypted_amount: input.handles[0],
                proof: input.proof,
                lock_duration: 10,
            })
            .await
            .unwrap();
        assert_eq!(decrypt_active_stake(&service, alice).await.unwrap(), Some(20));

        clock.advance(10);
        service.submit(Command::Withdraw { account: alice }).await.unwrap();
        assert_eq!(decrypt_active_stake(&service, alice).await.unwrap(), None);
    }
}
