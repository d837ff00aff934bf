//! Shareable async handle over the engine
//!
//! All access goes through one mutex, so commands are applied in a single
//! total order no matter how many tasks hold a handle. Co-processor work
//! runs on the blocking pool: a real FHE operation has unbounded latency and
//! cannot be cancelled once submitted.

use std::sync::Arc;

use parking_lot::Mutex;
use shade_fhe::{CipherAlgebra, CiphertextHandle, Decryptor, EncryptedInput};
use shade_ledger::Account;
use shade_staking::StakeRecord;
use tokio::task;

use crate::command::{Command, Receipt};
use crate::engine::Engine;
use crate::error::NodeResult;

pub struct StakingService<A> {
    inner: Arc<Mutex<Engine<A>>>,
}

impl<A> Clone for StakingService<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: CipherAlgebra + 'static> StakingService<A> {
    pub fn new(engine: Engine<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` against the engine on the blocking pool
    async fn with_engine<T, F>(&self, f: F) -> NodeResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Engine<A>) -> NodeResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || f(&mut inner.lock())).await?
    }

    pub async fn submit(&self, command: Command) -> NodeResult<Receipt> {
        self.with_engine(move |engine| engine.apply(command)).await
    }

    pub async fn encrypt_input(&self, account: Account, amount: u64) -> NodeResult<EncryptedInput> {
        self.with_engine(move |engine| engine.encrypt_input(account, amount))
            .await
    }

    pub fn confidential_balance_of(&self, account: &Account) -> Option<CiphertextHandle> {
        self.inner.lock().confidential_balance_of(account)
    }

    pub fn get_stake(&self, account: &Account) -> StakeRecord {
        self.inner.lock().get_stake(account)
    }

    pub fn has_active_stake(&self, account: &Account) -> bool {
        self.inner.lock().has_active_stake(account)
    }

    pub fn is_operator(&self, owner: &Account, spender: &Account) -> bool {
        self.inner.lock().is_operator(owner, spender)
    }

    pub fn sequence(&self) -> u64 {
        self.inner.lock().sequence()
    }

    /// Borrow the engine synchronously, e.g. to take a snapshot
    pub fn with<T>(&self, f: impl FnOnce(&Engine<A>) -> T) -> T {
        f(&self.inner.lock())
    }
}

impl<A: CipherAlgebra + Decryptor + 'static> StakingService<A> {
    /// ACL-gated decryption
    pub async fn user_decrypt(&self, requester: Account, handle: CiphertextHandle) -> NodeResult<u64> {
        self.with_engine(move |engine| engine.user_decrypt(&requester, &handle))
            .await
    }

    pub async fn decrypt_balance(&self, account: Account) -> NodeResult<u64> {
        self.with_engine(move |engine| engine.decrypt_balance(&account))
            .await
    }

    pub async fn decrypt_stake(&self, account: Account) -> NodeResult<u64> {
        self.with_engine(move |engine| engine.decrypt_stake(&account))
            .await
    }
}
