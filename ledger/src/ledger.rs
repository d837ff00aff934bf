//! Confidential balance ledger
//!
//! Balances are ciphertext handles. The ledger never decrypts: a debit
//! compares encrypted balance against encrypted amount and homomorphically
//! selects what to subtract, so an insufficient balance moves an encrypted
//! zero instead of failing.
//!
//! Mints are capped the same way. The ledger keeps an encrypted total supply
//! and a mint that would carry it past `u64::MAX` credits an encrypted zero.
//! Every balance is bounded by the supply, so a later credit cannot wrap.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shade_fhe::{CipherAlgebra, CiphertextHandle, InputVerifierKey};
use tracing::{debug, info};

use crate::authorization::{AuthorizationState, CiphertextAuthorization};
use crate::errors::{LedgerError, LedgerResult};
use crate::token::TokenMetadata;
use crate::{Account, Timestamp};

/// Ledger deployment parameters
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Address of the ledger itself; also the context inputs are encrypted for
    pub address: Account,
    /// Restrict `mint` to this caller (`None` = permissionless)
    pub minter: Option<Account>,
    /// Key used to verify encrypted input proofs
    pub verifier_key: InputVerifierKey,
    pub token: TokenMetadata,
}

impl LedgerConfig {
    pub fn new(address: Account, verifier_key: InputVerifierKey) -> Self {
        Self {
            address,
            minter: None,
            verifier_key,
            token: TokenMetadata::default(),
        }
    }

    /// Restrict minting
    pub fn with_minter(mut self, minter: Account) -> Self {
        self.minter = Some(minter);
        self
    }

    pub fn with_token(mut self, token: TokenMetadata) -> Self {
        self.token = token;
        self
    }
}

/// Persisted ledger state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub balances: HashMap<Account, CiphertextHandle>,
    /// `None` until the first mint
    #[serde(default)]
    pub total_supply: Option<CiphertextHandle>,
    pub authorization: AuthorizationState,
}

/// Per-account ciphertext balances
#[derive(Debug, Clone)]
pub struct ConfidentialBalanceLedger {
    config: LedgerConfig,
    balances: HashMap<Account, CiphertextHandle>,
    total_supply: Option<CiphertextHandle>,
    authorization: CiphertextAuthorization,
}

impl ConfidentialBalanceLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self::from_state(config, LedgerState::default())
    }

    /// Restore from a snapshot
    pub fn from_state(config: LedgerConfig, state: LedgerState) -> Self {
        let authorization = CiphertextAuthorization::from_state(config.verifier_key, state.authorization);
        Self {
            config,
            balances: state.balances,
            total_supply: state.total_supply,
            authorization,
        }
    }

    /// Capture state for a snapshot
    pub fn state(&self) -> LedgerState {
        LedgerState {
            balances: self.balances.clone(),
            total_supply: self.total_supply,
            authorization: self.authorization.state().clone(),
        }
    }

    pub fn address(&self) -> Account {
        self.config.address
    }

    pub fn token(&self) -> &TokenMetadata {
        &self.config.token
    }

    pub fn authorization(&self) -> &CiphertextAuthorization {
        &self.authorization
    }

    /// Grant `account` access to a handle the caller stores
    pub fn allow(&mut self, handle: CiphertextHandle, account: Account) {
        self.authorization.allow(handle, account);
    }

    /// Drop every ACL entry on a handle the caller no longer stores
    pub fn revoke(&mut self, handle: &CiphertextHandle) {
        self.authorization.revoke(handle);
    }

    /// Current balance handle. `None` means never credited (an encrypted zero).
    pub fn confidential_balance_of(&self, account: &Account) -> Option<CiphertextHandle> {
        self.balances.get(account).copied()
    }

    /// Encrypted sum of everything minted, readable by the ledger itself
    pub fn total_supply(&self) -> Option<CiphertextHandle> {
        self.total_supply
    }

    /// Stored handle, or a fresh encrypted zero the caller must release
    fn stored_or_zero(
        algebra: &dyn CipherAlgebra,
        stored: Option<CiphertextHandle>,
    ) -> LedgerResult<(CiphertextHandle, bool)> {
        match stored {
            Some(handle) => Ok((handle, false)),
            None => Ok((algebra.encrypt(0)?, true)),
        }
    }

    fn store_balance(&mut self, algebra: &dyn CipherAlgebra, account: Account, handle: CiphertextHandle) {
        if let Some(previous) = self.balances.insert(account, handle) {
            self.authorization.revoke(&previous);
            algebra.release(&[previous]);
        }
        self.authorization.allow(handle, account);
        self.authorization.allow(handle, self.config.address);
    }

    /// Credit `to` with a public amount. Returns the new balance handle.
    ///
    /// A mint that would overflow the total supply applies an encrypted zero.
    pub fn mint(
        &mut self,
        algebra: &dyn CipherAlgebra,
        caller: &Account,
        to: Account,
        amount: u64,
    ) -> LedgerResult<CiphertextHandle> {
        if let Some(minter) = self.config.minter {
            if minter != *caller {
                return Err(LedgerError::AuthorizationError {
                    owner: minter,
                    spender: *caller,
                });
            }
        }

        let minted = algebra.encrypt(amount)?;
        let (supply, _) = Self::stored_or_zero(algebra, self.total_supply)?;
        let sum = algebra.add(&supply, &minted)?;
        let fits = algebra.ge(&sum, &supply)?;
        let zero = algebra.encrypt(0)?;
        let applied = algebra.select(&fits, &minted, &zero)?;
        let new_supply = algebra.add(&supply, &applied)?;

        let updated = match self.balances.get(&to).copied() {
            Some(current) => algebra.add(&current, &applied)?,
            None => applied,
        };

        if let Some(previous) = self.total_supply.replace(new_supply) {
            self.authorization.revoke(&previous);
        }
        self.authorization.allow(new_supply, self.config.address);
        self.store_balance(algebra, to, updated);

        algebra.release(&[minted, sum, zero, supply]);
        algebra.release_bool(&fits);
        if updated != applied {
            algebra.release(&[applied]);
        }

        info!(%to, "minted");
        Ok(updated)
    }

    /// Move up to `amount` out of `from`. Returns the amount actually applied,
    /// which is an encrypted zero when the balance is insufficient.
    pub fn debit(
        &mut self,
        algebra: &dyn CipherAlgebra,
        from: Account,
        amount: &CiphertextHandle,
        caller: &Account,
        now: Timestamp,
    ) -> LedgerResult<CiphertextHandle> {
        if !self.authorization.check_operator(&from, caller, now) {
            return Err(LedgerError::AuthorizationError {
                owner: from,
                spender: *caller,
            });
        }

        let (current, fresh) = Self::stored_or_zero(algebra, self.balances.get(&from).copied())?;
        let sufficient = algebra.ge(&current, amount)?;
        let zero = algebra.encrypt(0)?;
        let applied = algebra.select(&sufficient, amount, &zero)?;
        let updated = algebra.sub(&current, &applied)?;

        self.store_balance(algebra, from, updated);
        self.authorization.allow(applied, from);
        self.authorization.allow(applied, *caller);

        algebra.release(&[zero]);
        algebra.release_bool(&sufficient);
        if fresh {
            algebra.release(&[current]);
        }

        debug!(%from, %caller, applied = %applied.short(), "confidential debit");
        Ok(applied)
    }

    /// Unconditionally add `amount` to `to`
    pub fn credit(
        &mut self,
        algebra: &dyn CipherAlgebra,
        to: Account,
        amount: &CiphertextHandle,
    ) -> LedgerResult<CiphertextHandle> {
        let (current, fresh) = Self::stored_or_zero(algebra, self.balances.get(&to).copied())?;
        let updated = algebra.add(&current, amount)?;
        self.store_balance(algebra, to, updated);
        if fresh {
            algebra.release(&[current]);
        }

        debug!(%to, amount = %amount.short(), "confidential credit");
        Ok(updated)
    }

    pub fn set_operator(&mut self, owner: Account, spender: Account, until: Timestamp) {
        self.authorization.set_operator(owner, spender, until);
    }

    pub fn is_operator(&self, owner: &Account, spender: &Account, now: Timestamp) -> bool {
        self.authorization.check_operator(owner, spender, now)
    }
}
