//! Ledger Commands - Mint, operator grants and balances

use clap::Args;
use shade_ledger::{Account, Timestamp};
use shade_node::{Command, DEFAULT_OPERATOR_UNTIL};

use super::Workspace;

/// Mint public amount into an account's confidential balance
#[derive(Args)]
pub struct MintCommand {
    /// Recipient
    #[arg(long)]
    to: Account,

    /// Amount in base units
    #[arg(long)]
    amount: u64,

    /// Minting account; defaults to the configured minter, else the recipient
    #[arg(long)]
    caller: Option<Account>,
}

impl MintCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let (config, service) = workspace.open()?;
        let caller = self
            .caller
            .or(config.deployment.minter)
            .unwrap_or(self.to);

        let receipt = service
            .submit(Command::Mint {
                caller,
                to: self.to,
                amount: self.amount,
            })
            .await?;
        workspace.persist(&service)?;

        let token = &config.deployment.token;
        workspace.print_receipt(
            &receipt,
            &format!("Minted {} {} to {}", token.format_units(self.amount), token.symbol, self.to),
        )
    }
}

/// Grant or revoke an operator
#[derive(Args)]
pub struct SetOperatorCommand {
    /// Account whose balance the operator may move
    #[arg(long)]
    owner: Account,

    /// Operator; defaults to the staking registry
    #[arg(long)]
    spender: Option<Account>,

    /// Grant expiry (unix seconds); a past value revokes
    #[arg(long, default_value_t = DEFAULT_OPERATOR_UNTIL)]
    until: Timestamp,
}

impl SetOperatorCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let (config, service) = workspace.open()?;
        let spender = self.spender.unwrap_or(config.deployment.staking_address);

        let receipt = service
            .submit(Command::SetOperator {
                owner: self.owner,
                spender,
                until: self.until,
            })
            .await?;
        workspace.persist(&service)?;

        workspace.print_receipt(
            &receipt,
            &format!("Operator {} set for {} until {}", spender, self.owner, self.until),
        )
    }
}

/// Decrypt an account's confidential balance
#[derive(Args)]
pub struct BalanceCommand {
    #[arg(long)]
    account: Account,
}

impl BalanceCommand {
    pub async fn execute(self, workspace: &Workspace) -> anyhow::Result<()> {
        let (config, service) = workspace.open()?;
        let handle = service.confidential_balance_of(&self.account);
        let balance = service.decrypt_balance(self.account).await?;
        let token = &config.deployment.token;

        if workspace.json {
            let out = serde_json::json!({
                "account": self.account,
                "handle": handle,
                "balance": balance,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        println!("Account: {}", self.account);
        match handle {
            Some(handle) => println!("Handle:  {}", handle),
            None => println!("Handle:  (none)"),
        }
        println!("Balance: {} {} ({} base units)", token.format_units(balance), token.symbol, balance);
        Ok(())
    }
}
