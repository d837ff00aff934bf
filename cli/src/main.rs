//! Shade CLI
//!
//! Deploys and drives a confidential staking ledger from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Deploy a local ledger and staking registry
//! shade init
//!
//! # Other networks keep their own data directory; pass --network every time
//! shade init --network testnet
//! shade addresses --network testnet
//!
//! # Fund an account and stake 250_000 base units for a minute
//! shade mint --to 0x... --amount 1000000
//! shade stake --account 0x... --amount 250000 --lock 60
//!
//! # Decrypt the stake and the remaining balance
//! shade stake-info --account 0x...
//! shade balance --account 0x...
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

use commands::{
    AddressesCommand, BalanceCommand, InitCommand, MintCommand, SetOperatorCommand, StakeCommand,
    StakeInfoCommand, WithdrawCommand, Workspace,
};
use config::ShadeConfig;

/// Shade confidential staking
#[derive(Parser)]
#[command(name = "shade")]
#[command(author = "Shade Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Confidential token staking on an FHE co-processor", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory; defaults to the network's directory
    #[arg(short, long, global = true, env = "SHADE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Network to deploy or operate on (local, testnet)
    #[arg(short, long, global = true, env = "SHADE_NETWORK", default_value = "local")]
    network: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new ledger and staking registry
    Init(InitCommand),

    /// Show deployed addresses
    Addresses(AddressesCommand),

    /// Mint into a confidential balance
    Mint(MintCommand),

    /// Grant or revoke an operator
    SetOperator(SetOperatorCommand),

    /// Stake an encrypted amount
    Stake(StakeCommand),

    /// Withdraw an unlocked stake
    Withdraw(WithdrawCommand),

    /// Decrypt a confidential balance
    Balance(BalanceCommand),

    /// Show and decrypt a stake
    StakeInfo(StakeInfoCommand),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let workspace = Workspace::locate(cli.config.clone(), cli.data_dir.clone(), &cli.network, cli.json);

    // Config may not exist yet (init), fall back to defaults
    let settings = ShadeConfig::load(&workspace.config_path)
        .map(|c| c.logging)
        .unwrap_or_default();
    logging::init(&settings, cli.log_level.as_deref(), cli.json_logs)?;

    match cli.command {
        Commands::Init(cmd) => cmd.execute(&cli.network, cli.config, cli.data_dir).await,
        Commands::Addresses(cmd) => cmd.execute(&workspace).await,
        Commands::Mint(cmd) => cmd.execute(&workspace).await,
        Commands::SetOperator(cmd) => cmd.execute(&workspace).await,
        Commands::Stake(cmd) => cmd.execute(&workspace).await,
        Commands::Withdraw(cmd) => cmd.execute(&workspace).await,
        Commands::Balance(cmd) => cmd.execute(&workspace).await,
        Commands::StakeInfo(cmd) => cmd.execute(&workspace).await,
        Commands::Version => {
            println!("shade {}", env!("CARGO_PKG_VERSION"));
            println!("Token: ConfidentialZama (cZama)");
            println!("Backend: dev co-processor");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stake_rejects_zero_lock() {
        let account = "0x0602a82f34709b7226323bc0f923319e94220e7d";
        let result = Cli::try_parse_from(["shade", "stake", "--account", account, "--amount", "10", "--lock", "0"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["shade", "stake", "--account", account, "--amount", "0", "--lock", "60"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["shade", "stake", "--account", account, "--amount", "10", "--lock", "60"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_network_selects_data_dir() {
        let cli = Cli::try_parse_from(["shade", "addresses", "--network", "testnet"]).unwrap();
        let workspace = Workspace::locate(cli.config, cli.data_dir, &cli.network, cli.json);
        assert!(workspace.data_dir.ends_with("testnet"));
        assert!(workspace.config_path.starts_with(&workspace.data_dir));

        let cli = Cli::try_parse_from(["shade", "addresses"]).unwrap();
        let workspace = Workspace::locate(cli.config, cli.data_dir, &cli.network, cli.json);
        assert!(workspace.data_dir.ends_with("local"));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let cli = Cli::try_parse_from(["shade", "init", "--network", "testnet", "--data-dir", "/tmp/shade-x"]).unwrap();
        let workspace = Workspace::locate(cli.config, cli.data_dir, &cli.network, cli.json);
        assert_eq!(workspace.data_dir, PathBuf::from("/tmp/shade-x"));
        assert_eq!(cli.network, "testnet");
    }

    #[test]
    fn test_bad_address_rejected() {
        let result = Cli::try_parse_from(["shade", "balance", "--account", "0x1234"]);
        assert!(result.is_err());
    }
}
