//! Deployment parameters
//!
//! Addresses and keys a deployment would otherwise hard-code as global
//! constants, passed explicitly to the engine instead.

use serde::{Deserialize, Serialize};
use shade_fhe::{Address, InputVerifierKey};
use shade_ledger::{Account, ConfidentialBalanceLedger, LedgerConfig, TokenMetadata};
use shade_staking::StakingConfig;

use crate::error::{NodeError, NodeResult};

/// Operator grant used by wallets when approving the registry
pub const DEFAULT_OPERATOR_UNTIL: u64 = (1 << 48) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub ledger_address: Account,
    pub staking_address: Account,
    /// Context stake inputs are encrypted for; the ledger address when unset
    pub input_context: Option<Account>,
    pub verifier_key: InputVerifierKey,
    /// Restrict minting to this account; permissionless when unset
    pub minter: Option<Account>,
    #[serde(default)]
    pub token: TokenMetadata,
}

impl DeploymentConfig {
    /// Fresh deployment with a random verifier key. Addresses are derived
    /// from `label` so that redeploying under the same label is reproducible.
    pub fn generate(label: &str) -> Self {
        Self {
            ledger_address: Address::derive(&format!("{}/ledger", label)),
            staking_address: Address::derive(&format!("{}/staking", label)),
            input_context: None,
            verifier_key: InputVerifierKey::generate(),
            minter: None,
            token: TokenMetadata::default(),
        }
    }

    /// Fully deterministic deployment for tests and local development
    pub fn local() -> Self {
        Self {
            verifier_key: InputVerifierKey::from_seed("local"),
            ..Self::generate("local")
        }
    }

    pub fn input_context(&self) -> Account {
        self.input_context.unwrap_or(self.ledger_address)
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        let config = LedgerConfig::new(self.ledger_address, self.verifier_key).with_token(self.token.clone());
        match self.minter {
            Some(minter) => config.with_minter(minter),
            None => config,
        }
    }

    pub fn staking_config(&self, ledger: &ConfidentialBalanceLedger) -> StakingConfig {
        StakingConfig::new(self.staking_address, ledger).with_input_context(self.input_context())
    }

    pub fn validate(&self) -> NodeResult<()> {
        if self.ledger_address == self.staking_address {
            return Err(NodeError::Config(
                "ledger and staking addresses must differ".into(),
            ));
        }
        if self.ledger_address == Address::ZERO || self.staking_address == Address::ZERO {
            return Err(NodeError::Config("zero address in deployment".into()));
        }
        if self.token.decimals > 18 {
            return Err(NodeError::Config(format!(
                "token decimals {} out of range",
                self.token.decimals
            )));
        }
        Ok(())
    }
}
