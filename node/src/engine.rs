//! Single-writer execution engine
//!
//! Owns the co-processor, the ledger and the registry, and applies one
//! [`Command`] at a time. Every applied command gets the next sequence
//! number; rejected commands leave no trace in state.

use std::sync::Arc;

use shade_fhe::{CipherAlgebra, CiphertextHandle, Decryptor, EncryptedInput, EncryptedInputBuilder};
use shade_ledger::{Account, ConfidentialBalanceLedger, Timestamp, TokenMetadata};
use shade_staking::{StakeRecord, StakingRegistry};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::command::{Command, Outcome, Receipt};
use crate::config::DeploymentConfig;
use crate::error::{NodeError, NodeResult};

pub struct Engine<A> {
    pub(crate) deployment: DeploymentConfig,
    pub(crate) algebra: A,
    pub(crate) ledger: ConfidentialBalanceLedger,
    pub(crate) registry: StakingRegistry,
    clock: Arc<dyn Clock>,
    pub(crate) sequence: u64,
    pub(crate) last_now: Timestamp,
}

impl<A: CipherAlgebra> Engine<A> {
    /// Empty deployment
    pub fn new(deployment: DeploymentConfig, algebra: A, clock: Arc<dyn Clock>) -> Self {
        let ledger = ConfidentialBalanceLedger::new(deployment.ledger_config());
        let registry = StakingRegistry::new(deployment.staking_config(&ledger));
        info!(
            ledger = %deployment.ledger_address,
            staking = %deployment.staking_address,
            "engine initialized"
        );
        Self::from_parts(deployment, algebra, ledger, registry, clock, 0, 0)
    }

    pub(crate) fn from_parts(
        deployment: DeploymentConfig,
        algebra: A,
        ledger: ConfidentialBalanceLedger,
        registry: StakingRegistry,
        clock: Arc<dyn Clock>,
        sequence: u64,
        last_now: Timestamp,
    ) -> Self {
        Self {
            deployment,
            algebra,
            ledger,
            registry,
            clock,
            sequence,
            last_now,
        }
    }

    pub fn deployment(&self) -> &DeploymentConfig {
        &self.deployment
    }

    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    pub fn token(&self) -> &TokenMetadata {
        self.ledger.token()
    }

    /// Sequence number of the last applied command
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Current engine time; never behind a previously applied command
    pub fn now(&self) -> Timestamp {
        self.last_now.max(self.clock.now())
    }

    /// Apply a command. On error nothing has changed.
    pub fn apply(&mut self, command: Command) -> NodeResult<Receipt> {
        let now = self.now();
        let kind = command.kind();

        let outcome = match self.execute(command, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(command = kind, error = %e, "command rejected");
                return Err(e);
            }
        };

        self.last_now = now;
        self.sequence += 1;
        debug!(command = kind, sequence = self.sequence, now, "command applied");

        Ok(Receipt {
            sequence: self.sequence,
            timestamp: now,
            outcome,
        })
    }

    fn execute(&mut self, command: Command, now: Timestamp) -> NodeResult<Outcome> {
        let outcome = match command {
            Command::Mint { caller, to, amount } => {
                let balance = self.ledger.mint(&self.algebra, &caller, to, amount)?;
                Outcome::Minted { to, balance }
            }
            Command::SetOperator { owner, spender, until } => {
                self.ledger.set_operator(owner, spender, until);
                Outcome::OperatorSet { owner, spender, until }
            }
            Command::Stake {
                account,
                encrypted_amount,
                proof,
                lock_duration,
            } => {
                let event = self.registry.stake(
                    &self.algebra,
                    &mut self.ledger,
                    account,
                    &encrypted_amount,
                    &proof,
                    lock_duration,
                    now,
                )?;
                Outcome::Staking(event)
            }
            Command::Withdraw { account } => {
                let event = self.registry.withdraw(&self.algebra, &mut self.ledger, account, now)?;
                Outcome::Staking(event)
            }
        };
        Ok(outcome)
    }

    /// Encrypt `amount` as a stake input for `account`, the way a wallet would
    pub fn encrypt_input(&self, account: Account, amount: u64) -> NodeResult<EncryptedInput> {
        let input = EncryptedInputBuilder::new(self.deployment.input_context(), account)
            .add64(amount)
            .encrypt(&self.algebra, &self.deployment.verifier_key)?;
        Ok(input)
    }

    pub fn confidential_balance_of(&self, account: &Account) -> Option<CiphertextHandle> {
        self.ledger.confidential_balance_of(account)
    }

    /// Encrypted total minted; `None` before the first mint
    pub fn total_supply(&self) -> Option<CiphertextHandle> {
        self.ledger.total_supply()
    }

    pub fn get_stake(&self, account: &Account) -> StakeRecord {
        self.registry.get_stake(account)
    }

    pub fn has_active_stake(&self, account: &Account) -> bool {
        self.registry.has_active_stake(account)
    }

    pub fn is_operator(&self, owner: &Account, spender: &Account) -> bool {
        self.ledger.is_operator(owner, spender, self.now())
    }

    pub fn operator_grants(&self, owner: &Account) -> Vec<(Account, Timestamp)> {
        self.ledger.authorization().operator_grants(owner)
    }

    pub fn active_stakes(&self) -> usize {
        self.registry.active_stakes()
    }
}

impl<A: CipherAlgebra + Decryptor> Engine<A> {
    /// Decrypt a handle on behalf of `requester`, who must be on its ACL
    pub fn user_decrypt(&self, requester: &Account, handle: &CiphertextHandle) -> NodeResult<u64> {
        if !self.ledger.authorization().is_allowed(handle, requester) {
            return Err(NodeError::AccessDenied {
                requester: *requester,
                handle: *handle,
            });
        }
        Ok(self.algebra.decrypt(handle)?)
    }

    /// Plaintext balance of `account` as seen by itself; zero when never credited
    pub fn decrypt_balance(&self, account: &Account) -> NodeResult<u64> {
        match self.confidential_balance_of(account) {
            Some(handle) => self.user_decrypt(account, &handle),
            None => Ok(0),
        }
    }

    /// Plaintext total supply as seen by the ledger
    pub fn decrypt_total_supply(&self) -> NodeResult<u64> {
        match self.total_supply() {
            Some(handle) => self.user_decrypt(&self.deployment.ledger_address, &handle),
            None => Ok(0),
        }
    }

    /// Plaintext stake amount of `account` as seen by itself
    pub fn decrypt_stake(&self, account: &Account) -> NodeResult<u64> {
        match self.get_stake(account).amount {
            Some(handle) => self.user_decrypt(account, &handle),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::DEFAULT_OPERATOR_UNTIL;
    use shade_fhe::{Address, DevAlgebra};
    use shade_staking::{StakingError, StakingEvent};

    const START: Timestamp = 1_700_000_000;

    fn create_test_engine() -> (Engine<DevAlgebra>, ManualClock) {
        let clock = ManualClock::new(START);
        let engine = Engine::new(DeploymentConfig::local(), DevAlgebra::new(), Arc::new(clock.clone()));
        (engine, clock)
    }

    fn stake_command(engine: &Engine<DevAlgebra>, account: Account, amount: u64, lock: u64) -> Command {
        let input = engine.encrypt_input(account, amount).unwrap();
        Command::Stake {
            account,
            encrypted_amount: input.handles[0],
            proof: input.proof,
            lock_duration: lock,
        }
    }

    #[test]
    fn test_sequence_only_advances_on_success() {
        let (mut engine, _) = create_test_engine();
        let alice = Address::derive("alice");

        let receipt = engine
            .apply(Command::Mint { caller: alice, to: alice, amount: 5 })
            .unwrap();
        assert_eq!(receipt.sequence, 1);
        assert_eq!(receipt.timestamp, START);

        let result = engine.apply(Command::Withdraw { account: alice });
        assert!(matches!(
            result,
            Err(NodeError::Staking(StakingError::NoActiveStake))
        ));
        assert_eq!(engine.sequence(), 1);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let (mut engine, clock) = create_test_engine();
        let alice = Address::derive("alice");
        engine
            .apply(Command::Mint { caller: alice, to: alice, amount: 1 })
            .unwrap();

        clock.set(START - 100);
        assert_eq!(engine.now(), START);
    }

    #[test]
    fn test_stake_flow() {
        let (mut engine, clock) = create_test_engine();
        let (alice, staking) = (Address::derive("alice"), engine.deployment().staking_address);

        engine
            .apply(Command::Mint { caller: alice, to: alice, amount: 1_000_000 })
            .unwrap();
        engine
            .apply(Command::SetOperator { owner: alice, spender: staking, until: DEFAULT_OPERATOR_UNTIL })
            .unwrap();
        assert!(engine.is_operator(&alice, &staking));

        let command = stake_command(&engine, alice, 250_000, 60);
        let receipt = engine.apply(command).unwrap();
        assert!(matches!(
            receipt.event(),
            Some(StakingEvent::Staked { unlock_time, .. }) if *unlock_time == START + 60
        ));
        assert_eq!(engine.decrypt_stake(&alice).unwrap(), 250_000);
        assert_eq!(engine.decrypt_balance(&alice).unwrap(), 750_000);

        clock.advance(60);
        engine.apply(Command::Withdraw { account: alice }).unwrap();
        assert_eq!(engine.decrypt_balance(&alice).unwrap(), 1_000_000);
        assert!(!engine.has_active_stake(&alice));
        assert_eq!(engine.decrypt_stake(&alice).unwrap(), 0);
    }

    #[test]
    fn test_user_decrypt_requires_acl() {
        let (mut engine, _) = create_test_engine();
        let (alice, bob) = (Address::derive("alice"), Address::derive("bob"));
        engine
            .apply(Command::Mint { caller: alice, to: alice, amount: 10 })
            .unwrap();
        let handle = engine.confidential_balance_of(&alice).unwrap();

        assert_eq!(engine.user_decrypt(&alice, &handle).unwrap(), 10);
        let result = engine.user_decrypt(&bob, &handle);
        assert!(matches!(result, Err(NodeError::AccessDenied { .. })));
    }

    #[test]
    fn test_unfunded_account_reads_zero() {
        let (engine, _) = create_test_engine();
        let carol = Address::derive("carol");
        assert_eq!(engine.decrypt_balance(&carol).unwrap(), 0);
        assert_eq!(engine.decrypt_stake(&carol).unwrap(), 0);
        assert_eq!(engine.get_stake(&carol), StakeRecord::default());
    }
}
