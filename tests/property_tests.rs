//! Property-Based Tests for Shade
//!
//! Uses proptest to drive the engine through random command sequences and
//! check that value is conserved and rejected commands change nothing.

use std::sync::Arc;

use proptest::prelude::*;
use shade::prelude::*;

const ACCOUNTS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Mint { who: usize, amount: u64 },
    Stake { who: usize, amount: u64, lock: u64 },
    Withdraw { who: usize },
    Advance { seconds: u64 },
}

// =============================================================================
// PROPTEST STRATEGIES
// =============================================================================

/// Everyday amounts, plus amounts right at the top of the u64 range
fn amount() -> impl Strategy<Value = u64> {
    prop_oneof![
        4 => 0..1_500_000u64,
        1 => (u64::MAX - 1_000)..=u64::MAX,
    ]
}

fn op() -> impl Strategy<Value = Op> {
    let who = 0..ACCOUNTS;
    prop_oneof![
        (who.clone(), amount()).prop_map(|(who, amount)| Op::Mint { who, amount }),
        (who.clone(), amount(), 0..120u64)
            .prop_map(|(who, amount, lock)| Op::Stake { who, amount, lock }),
        who.prop_map(|who| Op::Withdraw { who }),
        (0..90u64).prop_map(|seconds| Op::Advance { seconds }),
    ]
}

struct Model {
    engine: Engine<DevAlgebra>,
    clock: ManualClock,
    accounts: Vec<Account>,
    /// Sum of every requested mint, capped or not
    requested: u128,
}

impl Model {
    fn new() -> Self {
        let clock = ManualClock::new(0);
        let mut engine = Engine::new(DeploymentConfig::local(), DevAlgebra::new(), Arc::new(clock.clone()));
        let staking = engine.deployment().staking_address;
        let accounts: Vec<Account> = (0..ACCOUNTS)
            .map(|i| Address::derive(&format!("account-{}", i)))
            .collect();

        for owner in &accounts {
            engine
                .apply(Command::SetOperator {
                    owner: *owner,
                    spender: staking,
                    until: DEFAULT_OPERATOR_UNTIL,
                })
                .unwrap();
        }

        Self {
            engine,
            clock,
            accounts,
            requested: 0,
        }
    }

    fn run(&mut self, op: Op) -> Result<(), NodeError> {
        match op {
            Op::Mint { who, amount } => {
                let to = self.accounts[who];
                self.engine.apply(Command::Mint { caller: to, to, amount })?;
                self.requested += u128::from(amount);
            }
            Op::Stake { who, amount, lock } => {
                let account = self.accounts[who];
                let input = self.engine.encrypt_input(account, amount)?;
                self.engine.apply(Command::Stake {
                    account,
                    encrypted_amount: input.handles[0],
                    proof: input.proof,
                    lock_duration: lock,
                })?;
            }
            Op::Withdraw { who } => {
                let account = self.accounts[who];
                self.engine.apply(Command::Withdraw { account })?;
            }
            Op::Advance { seconds } => self.clock.advance(seconds),
        }
        Ok(())
    }

    fn total_held(&self) -> u128 {
        self.accounts
            .iter()
            .map(|account| {
                let balance = self.engine.decrypt_balance(account).unwrap();
                let staked = if self.engine.has_active_stake(account) {
                    self.engine.decrypt_stake(account).unwrap()
                } else {
                    0
                };
                u128::from(balance) + u128::from(staked)
            })
            .sum()
    }

    fn supply(&self) -> u128 {
        u128::from(self.engine.decrypt_total_supply().unwrap())
    }

    fn fingerprint(&self) -> Vec<(Option<CiphertextHandle>, StakeRecord)> {
        self.accounts
            .iter()
            .map(|a| (self.engine.confidential_balance_of(a), self.engine.get_stake(a)))
            .collect()
    }
}

// =============================================================================
// ENGINE PROPERTY TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: balances plus active stakes always equal the total minted
    #[test]
    fn value_is_conserved(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = Model::new();
        for op in ops {
            let _ = model.run(op);
            prop_assert_eq!(model.total_held(), model.supply());
            prop_assert!(model.supply() <= model.requested);
            if model.requested <= u128::from(u64::MAX) {
                prop_assert_eq!(model.supply(), model.requested);
            }
        }
    }

    /// Property: a mint is either applied whole or, past the cap, not at all
    #[test]
    fn mints_never_wrap(first in amount(), second in amount()) {
        let mut model = Model::new();
        model.run(Op::Mint { who: 0, amount: first }).unwrap();
        model.run(Op::Mint { who: 1, amount: second }).unwrap();

        let expected = if u128::from(first) + u128::from(second) <= u128::from(u64::MAX) {
            u128::from(first) + u128::from(second)
        } else {
            u128::from(first)
        };
        prop_assert_eq!(model.supply(), expected);
        prop_assert_eq!(model.total_held(), expected);
    }

    /// Property: a rejected command leaves state and sequence untouched
    #[test]
    fn rejected_commands_change_nothing(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = Model::new();
        for op in ops {
            let before = model.fingerprint();
            let sequence = model.engine.sequence();
            if model.run(op).is_err() {
                prop_assert_eq!(model.fingerprint(), before);
                prop_assert_eq!(model.engine.sequence(), sequence);
            }
        }
    }

    /// Property: sequence numbers advance by one per applied command
    #[test]
    fn sequence_counts_applied_commands(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = Model::new();
        let mut applied = model.engine.sequence();
        for op in ops {
            let advances = !matches!(op, Op::Advance { .. });
            if model.run(op).is_ok() && advances {
                applied += 1;
            }
        }
        prop_assert_eq!(model.engine.sequence(), applied);
    }

    /// Property: a stake can never be withdrawn before its unlock time
    #[test]
    fn locked_stake_is_not_withdrawable(amount in 0..1_000u64, lock in 1..1_000u64, wait in 0..2_000u64) {
        let mut model = Model::new();
        model.run(Op::Mint { who: 0, amount: 1_000 }).unwrap();
        model.run(Op::Stake { who: 0, amount, lock }).unwrap();
        model.run(Op::Advance { seconds: wait }).unwrap();

        let result = model.run(Op::Withdraw { who: 0 });
        if wait < lock {
            let is_locked = matches!(result, Err(NodeError::Staking(StakingError::StakeLocked { .. })));
            prop_assert!(is_locked);
            prop_assert!(model.engine.has_active_stake(&model.accounts[0]));
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(model.engine.decrypt_balance(&model.accounts[0]).unwrap(), 1_000);
        }
    }
}
