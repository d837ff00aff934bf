//! Ciphertext authorization
//!
//! Three kinds of permission live here:
//! - input proofs: an externally encrypted handle is only accepted from the
//!   account it was encrypted for, and only in the context it was encrypted for
//! - operator grants: `(owner, spender) -> until`, letting `spender` move
//!   `owner`'s confidential balance while `now <= until`
//! - handle ACL: which accounts may use or decrypt a stored handle

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use shade_fhe::{CiphertextHandle, EncryptedInputProof, InputVerifierKey};
use tracing::debug;

use crate::errors::{LedgerError, LedgerResult};
use crate::{Account, Timestamp};

/// Persisted authorization state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationState {
    /// owner -> spender -> until
    grants: HashMap<Account, HashMap<Account, Timestamp>>,
    acl: HashMap<CiphertextHandle, HashSet<Account>>,
}

#[derive(Debug, Clone)]
pub struct CiphertextAuthorization {
    verifier: InputVerifierKey,
    state: AuthorizationState,
}

impl CiphertextAuthorization {
    pub fn new(verifier: InputVerifierKey) -> Self {
        Self::from_state(verifier, AuthorizationState::default())
    }

    pub fn from_state(verifier: InputVerifierKey, state: AuthorizationState) -> Self {
        Self { verifier, state }
    }

    pub fn state(&self) -> &AuthorizationState {
        &self.state
    }

    /// Check that `proof` binds `handle` to `expected_submitter` and `expected_context`.
    pub fn validate_input(
        &self,
        handle: &CiphertextHandle,
        proof: &EncryptedInputProof,
        expected_submitter: &Account,
        expected_context: &Account,
    ) -> LedgerResult<()> {
        if proof.submitter != *expected_submitter {
            return Err(LedgerError::InvalidProof(format!(
                "input encrypted for {}, submitted by {}",
                proof.submitter, expected_submitter
            )));
        }
        if proof.context != *expected_context {
            return Err(LedgerError::InvalidProof(format!(
                "input encrypted for context {}, expected {}",
                proof.context, expected_context
            )));
        }
        if !proof.covers(handle) {
            return Err(LedgerError::InvalidProof(format!(
                "handle {} not covered by proof",
                handle.short()
            )));
        }
        if !proof.verify(&self.verifier) {
            return Err(LedgerError::InvalidProof("bad proof tag".into()));
        }
        Ok(())
    }

    /// An account is always its own operator.
    pub fn check_operator(&self, owner: &Account, spender: &Account, now: Timestamp) -> bool {
        if owner == spender {
            return true;
        }
        self.state
            .grants
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .map_or(false, |until| now <= *until)
    }

    /// Upsert a grant. A past `until` revokes.
    pub fn set_operator(&mut self, owner: Account, spender: Account, until: Timestamp) {
        debug!(%owner, %spender, until, "operator grant updated");
        self.state.grants.entry(owner).or_default().insert(spender, until);
    }

    /// All grants issued by `owner`, sorted by spender
    pub fn operator_grants(&self, owner: &Account) -> Vec<(Account, Timestamp)> {
        let mut grants: Vec<_> = self
            .state
            .grants
            .get(owner)
            .map(|spenders| spenders.iter().map(|(s, u)| (*s, *u)).collect())
            .unwrap_or_default();
        grants.sort();
        grants
    }

    pub fn allow(&mut self, handle: CiphertextHandle, account: Account) {
        self.state.acl.entry(handle).or_default().insert(account);
    }

    /// Forget every grant on a handle that is no longer stored
    pub fn revoke(&mut self, handle: &CiphertextHandle) {
        self.state.acl.remove(handle);
    }

    /// Number of handles with at least one grant
    pub fn acl_len(&self) -> usize {
        self.state.acl.len()
    }

    pub fn is_allowed(&self, handle: &CiphertextHandle, account: &Account) -> bool {
        self.state
            .acl
            .get(handle)
            .map_or(false, |accounts| accounts.contains(account))
    }
}
