//! Encrypted inputs
//!
//! A client encrypts values for a specific `(context, submitter)` pair and
//! gets back handles plus a proof binding those handles to the pair. The
//! ledger refuses any externally supplied handle whose proof does not verify
//! for the account submitting it and the context receiving it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algebra::CipherAlgebra;
use crate::handle::{Address, CiphertextHandle};
use crate::FHEResult;

const PROOF_DOMAIN: &[u8] = b"shade-input-proof-v1";

/// Key shared between the input encryptor and the verifier
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InputVerifierKey(pub [u8; 32]);

impl InputVerifierKey {
    /// Fresh random key
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Deterministic key from a seed phrase (tests, local networks)
    pub fn from_seed(seed: &str) -> Self {
        Self(blake3::derive_key("shade input verifier key v1", seed.as_bytes()))
    }

    fn mac(&self, context: &Address, submitter: &Address, handles: &[CiphertextHandle]) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.0);
        hasher.update(PROOF_DOMAIN);
        hasher.update(context.as_bytes());
        hasher.update(submitter.as_bytes());
        hasher.update(&(handles.len() as u32).to_le_bytes());
        for handle in handles {
            hasher.update(handle.as_bytes());
        }
        hasher.finalize()
    }
}

impl fmt::Debug for InputVerifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = blake3::hash(&self.0);
        f.debug_struct("InputVerifierKey")
            .field("id", &hex::encode(&id.as_bytes()[..8]))
            .finish()
    }
}

hex_serde!(InputVerifierKey, 32);

/// Proof binding a batch of handles to a submitter and a context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedInputProof {
    pub context: Address,
    pub submitter: Address,
    pub handles: Vec<CiphertextHandle>,
    pub tag: [u8; 32],
}

impl EncryptedInputProof {
    /// Check the tag under `key`
    pub fn verify(&self, key: &InputVerifierKey) -> bool {
        // blake3::Hash equality is constant time
        key.mac(&self.context, &self.submitter, &self.handles) == blake3::Hash::from(self.tag)
    }

    /// Whether `handle` is one of the proven inputs
    pub fn covers(&self, handle: &CiphertextHandle) -> bool {
        self.handles.contains(handle)
    }
}

/// Output of [`EncryptedInputBuilder::encrypt`]
#[derive(Clone, Debug)]
pub struct EncryptedInput {
    pub handles: Vec<CiphertextHandle>,
    pub proof: EncryptedInputProof,
}

/// Client-side builder for encrypted inputs
#[derive(Clone, Debug)]
pub struct EncryptedInputBuilder {
    context: Address,
    submitter: Address,
    values: Vec<u64>,
}

impl EncryptedInputBuilder {
    pub fn new(context: Address, submitter: Address) -> Self {
        Self {
            context,
            submitter,
            values: Vec::new(),
        }
    }

    /// Queue a 64-bit value
    pub fn add64(mut self, value: u64) -> Self {
        self.values.push(value);
        self
    }

    /// Encrypt all queued values and produce the binding proof
    pub fn encrypt(self, algebra: &dyn CipherAlgebra, key: &InputVerifierKey) -> FHEResult<EncryptedInput> {
        let handles = self
            .values
            .iter()
            .map(|v| algebra.encrypt(*v))
            .collect::<FHEResult<Vec<_>>>()?;

        let tag = *key.mac(&self.context, &self.submitter, &handles).as_bytes();

        Ok(EncryptedInput {
            handles: handles.clone(),
            proof: EncryptedInputProof {
                context: self.context,
                submitter: self.submitter,
                handles,
                tag,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Decryptor, DevAlgebra};

    fn setup() -> (DevAlgebra, InputVerifierKey, Address, Address) {
        (
            DevAlgebra::new(),
            InputVerifierKey::from_seed("test"),
            Address::derive("ledger"),
            Address::derive("alice"),
        )
    }

    #[test]
    fn test_encrypt_and_verify() {
        let (algebra, key, context, alice) = setup();

        let input = EncryptedInputBuilder::new(context, alice)
            .add64(250_000)
            .encrypt(&algebra, &key)
            .unwrap();

        assert_eq!(input.handles.len(), 1);
        assert!(input.proof.verify(&key));
        assert!(input.proof.covers(&input.handles[0]));
        assert_eq!(algebra.decrypt(&input.handles[0]).unwrap(), 250_000);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let (algebra, key, context, alice) = setup();
        let input = EncryptedInputBuilder::new(context, alice)
            .add64(1)
            .encrypt(&algebra, &key)
            .unwrap();

        assert!(!input.proof.verify(&InputVerifierKey::from_seed("other")));
    }

    #[test]
    fn test_tampered_submitter_rejected() {
        let (algebra, key, context, alice) = setup();
        let mut input = EncryptedInputBuilder::new(context, alice)
            .add64(1)
            .encrypt(&algebra, &key)
            .unwrap();

        input.proof.submitter = Address::derive("mallory");
        assert!(!input.proof.verify(&key));
    }

    #[test]
    fn test_tampered_handle_rejected() {
        let (algebra, key, context, alice) = setup();
        let mut input = EncryptedInputBuilder::new(context, alice)
            .add64(1)
            .add64(2)
            .encrypt(&algebra, &key)
            .unwrap();

        input.proof.handles.swap(0, 1);
        assert!(!input.proof.verify(&key));
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let key = InputVerifierKey::generate();
        let parsed: InputVerifierKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }
}
