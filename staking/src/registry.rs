//! Time-locked staking with encrypted stake amounts
//!
//! One stake per account. Staking debits the staker on the ledger with the
//! registry acting as operator; the amount actually debited (possibly an
//! encrypted zero) is what gets recorded. Withdrawal credits the recorded
//! amount back once the lock has elapsed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shade_fhe::{CipherAlgebra, CiphertextHandle, EncryptedInputProof};
use shade_ledger::{Account, ConfidentialBalanceLedger, Timestamp};
use tracing::info;

use crate::errors::{StakingError, StakingResult};
use crate::events::StakingEvent;

/// Registry deployment parameters
#[derive(Debug, Clone)]
pub struct StakingConfig {
    /// Registry address; acts as operator on the ledger
    pub address: Account,
    /// Context stake inputs must be encrypted for
    pub input_context: Account,
}

impl StakingConfig {
    /// Inputs are encrypted for the ledger, as wallets do for the token
    pub fn new(address: Account, ledger: &ConfidentialBalanceLedger) -> Self {
        Self {
            address,
            input_context: ledger.address(),
        }
    }

    pub fn with_input_context(mut self, context: Account) -> Self {
        self.input_context = context;
        self
    }
}

/// Stake state for one account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// `None` until the account first stakes
    pub amount: Option<CiphertextHandle>,
    pub unlock_time: Timestamp,
    pub active: bool,
}

/// Persisted registry state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    pub records: HashMap<Account, StakeRecord>,
}

#[derive(Debug)]
pub struct StakingRegistry {
    pub config: StakingConfig,
    records: HashMap<Account, StakeRecord>,
}

impl StakingRegistry {
    pub fn new(config: StakingConfig) -> Self {
        Self::from_state(config, RegistryState::default())
    }

    pub fn from_state(config: StakingConfig, state: RegistryState) -> Self {
        Self {
            config,
            records: state.records,
        }
    }

    pub fn state(&self) -> RegistryState {
        RegistryState {
            records: self.records.clone(),
        }
    }

    pub fn address(&self) -> Account {
        self.config.address
    }

    /// Lock an encrypted amount for `lock_duration` seconds
    #[allow(clippy::too_many_arguments)]
    pub fn stake(
        &mut self,
        algebra: &dyn CipherAlgebra,
        ledger: &mut ConfidentialBalanceLedger,
        account: Account,
        encrypted_amount: &CiphertextHandle,
        proof: &EncryptedInputProof,
        lock_duration: u64,
        now: Timestamp,
    ) -> StakingResult<StakingEvent> {
        if lock_duration == 0 {
            return Err(StakingError::InvalidDuration(lock_duration));
        }
        let unlock_time = now
            .checked_add(lock_duration)
            .ok_or(StakingError::InvalidDuration(lock_duration))?;

        if self.has_active_stake(&account) {
            return Err(StakingError::StakeAlreadyActive);
        }

        ledger.authorization().validate_input(
            encrypted_amount,
            proof,
            &account,
            &self.config.input_context,
        )?;

        let applied = ledger.debit(algebra, account, encrypted_amount, &self.config.address, now)?;
        ledger.allow(*encrypted_amount, account);

        // Zero left behind by the previous withdrawal
        if let Some(previous) = self.get_stake_amount(&account) {
            ledger.revoke(&previous);
            algebra.release(&[previous]);
        }
        self.records.insert(
            account,
            StakeRecord {
                amount: Some(applied),
                unlock_time,
                active: true,
            },
        );

        info!(%account, unlock_time, amount = %applied.short(), "Staked");
        Ok(StakingEvent::Staked {
            account,
            amount: applied,
            unlock_time,
        })
    }

    /// Return the stake to the staker once unlocked. The returned event names
    /// the withdrawn handle, which is released once credited.
    pub fn withdraw(
        &mut self,
        algebra: &dyn CipherAlgebra,
        ledger: &mut ConfidentialBalanceLedger,
        account: Account,
        now: Timestamp,
    ) -> StakingResult<StakingEvent> {
        let record = self.get_stake(&account);
        let amount = match (record.active, record.amount) {
            (true, Some(amount)) => amount,
            _ => return Err(StakingError::NoActiveStake),
        };

        if now < record.unlock_time {
            return Err(StakingError::StakeLocked {
                unlock_time: record.unlock_time,
                now,
            });
        }

        let zero = algebra.encrypt(0)?;
        ledger.credit(algebra, account, &amount)?;

        ledger.revoke(&amount);
        algebra.release(&[amount]);
        ledger.allow(zero, account);
        self.records.insert(
            account,
            StakeRecord {
                amount: Some(zero),
                unlock_time: 0,
                active: false,
            },
        );

        info!(%account, amount = %amount.short(), "Withdrawn");
        Ok(StakingEvent::Withdrawn { account, amount })
    }

    /// Stake record; the default (inactive) record for unknown accounts
    pub fn get_stake(&self, account: &Account) -> StakeRecord {
        self.records.get(account).copied().unwrap_or_default()
    }

    pub fn get_stake_amount(&self, account: &Account) -> Option<CiphertextHandle> {
        self.get_stake(account).amount
    }

    pub fn get_stake_unlock_time(&self, account: &Account) -> Timestamp {
        self.get_stake(account).unlock_time
    }

    pub fn has_active_stake(&self, account: &Account) -> bool {
        self.get_stake(account).active
    }

    /// Number of accounts currently staked
    pub fn active_stakes(&self) -> usize {
        self.records.values().filter(|r| r.active).count()
    }
}
