//! In-memory development co-processor
//!
//! Tracks the plaintext behind every handle it issues so that local
//! deployments and tests can run the full staking flow without TFHE keys.
//! Arithmetic wraps modulo 2^64 like the real `FheUint64`.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::algebra::{CipherAlgebra, Decryptor};
use crate::handle::{CiphertextHandle, EncryptedBool};
use crate::{FHEError, FHEResult};

/// Serializable contents of a [`DevAlgebra`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevStore {
    values: HashMap<CiphertextHandle, u64>,
    bools: HashMap<EncryptedBool, bool>,
    nonce: u64,
}

impl DevStore {
    fn next_id(&mut self, op: &str) -> [u8; 32] {
        self.nonce += 1;
        let mut hasher = blake3::Hasher::new_derive_key("shade dev co-processor handle v1");
        hasher.update(op.as_bytes());
        hasher.update(&self.nonce.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    fn value(&self, handle: &CiphertextHandle) -> FHEResult<u64> {
        self.values
            .get(handle)
            .copied()
            .ok_or(FHEError::UnknownHandle(*handle))
    }

    fn insert_value(&mut self, op: &str, value: u64) -> CiphertextHandle {
        let handle = CiphertextHandle(self.next_id(op));
        self.values.insert(handle, value);
        trace!(op, handle = %handle.short(), "dev ciphertext issued");
        handle
    }
}

/// Plaintext-tracking implementation of [`CipherAlgebra`]
#[derive(Debug, Default)]
pub struct DevAlgebra {
    store: RwLock<DevStore>,
}

impl DevAlgebra {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a previously captured store
    pub fn from_store(store: DevStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    /// Copy of the current store, for snapshots
    pub fn store(&self) -> DevStore {
        self.store.read().clone()
    }

    /// Number of live ciphertexts
    pub fn len(&self) -> usize {
        self.store.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CipherAlgebra for DevAlgebra {
    fn encrypt(&self, value: u64) -> FHEResult<CiphertextHandle> {
        Ok(self.store.write().insert_value("encrypt", value))
    }

    fn add(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<CiphertextHandle> {
        let mut store = self.store.write();
        let sum = store.value(a)?.wrapping_add(store.value(b)?);
        Ok(store.insert_value("add", sum))
    }

    fn sub(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<CiphertextHandle> {
        let mut store = self.store.write();
        let diff = store.value(a)?.wrapping_sub(store.value(b)?);
        Ok(store.insert_value("sub", diff))
    }

    fn ge(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<EncryptedBool> {
        let mut store = self.store.write();
        let result = store.value(a)? >= store.value(b)?;
        let handle = EncryptedBool(store.next_id("ge"));
        store.bools.insert(handle, result);
        Ok(handle)
    }

    fn select(
        &self,
        cond: &EncryptedBool,
        if_true: &CiphertextHandle,
        if_false: &CiphertextHandle,
    ) -> FHEResult<CiphertextHandle> {
        let mut store = self.store.write();
        let flag = *store
            .bools
            .get(cond)
            .ok_or_else(|| FHEError::UnknownBool(cond.short()))?;
        let chosen = if flag {
            store.value(if_true)?
        } else {
            store.value(if_false)?
        };
        Ok(store.insert_value("select", chosen))
    }

    fn release(&self, handles: &[CiphertextHandle]) {
        let mut store = self.store.write();
        for handle in handles {
            store.values.remove(handle);
        }
    }

    fn release_bool(&self, cond: &EncryptedBool) {
        self.store.write().bools.remove(cond);
    }
}

impl Decryptor for DevAlgebra {
    fn decrypt(&self, handle: &CiphertextHandle) -> FHEResult<u64> {
        self.store.read().value(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let algebra = DevAlgebra::new();
        let handle = algebra.encrypt(12345).unwrap();
        assert_eq!(algebra.decrypt(&handle).unwrap(), 12345);
    }

    #[test]
    fn test_handles_are_unique() {
        let algebra = DevAlgebra::new();
        let a = algebra.encrypt(7).unwrap();
        let b = algebra.encrypt(7).unwrap();
        assert_ne!(a, b);
        assert_eq!(algebra.len(), 2);
    }

    #[test]
    fn test_add_sub_wrap() {
        let algebra = DevAlgebra::new();
        let max = algebra.encrypt(u64::MAX).unwrap();
        let one = algebra.encrypt(1).unwrap();

        let sum = algebra.add(&max, &one).unwrap();
        assert_eq!(algebra.decrypt(&sum).unwrap(), 0);

        let zero = algebra.encrypt(0).unwrap();
        let diff = algebra.sub(&zero, &one).unwrap();
        assert_eq!(algebra.decrypt(&diff).unwrap(), u64::MAX);
    }

    #[test]
    fn test_ge_and_select() {
        let algebra = DevAlgebra::new();
        let hundred = algebra.encrypt(100).unwrap();
        let fifty = algebra.encrypt(50).unwrap();
        let zero = algebra.encrypt(0).unwrap();

        let enough = algebra.ge(&hundred, &fifty).unwrap();
        let picked = algebra.select(&enough, &fifty, &zero).unwrap();
        assert_eq!(algebra.decrypt(&picked).unwrap(), 50);

        let short = algebra.ge(&fifty, &hundred).unwrap();
        let picked = algebra.select(&short, &hundred, &zero).unwrap();
        assert_eq!(algebra.decrypt(&picked).unwrap(), 0);
    }

    #[test]
    fn test_ge_equal_values() {
        let algebra = DevAlgebra::new();
        let a = algebra.encrypt(250_000).unwrap();
        let b = algebra.encrypt(250_000).unwrap();
        let cond = algebra.ge(&a, &b).unwrap();
        let picked = algebra.select(&cond, &a, &b).unwrap();
        assert_eq!(algebra.decrypt(&picked).unwrap(), 250_000);
    }

    #[test]
    fn test_unknown_handle() {
        let algebra = DevAlgebra::new();
        let known = algebra.encrypt(1).unwrap();
        let bogus = CiphertextHandle([9u8; 32]);

        assert_eq!(
            algebra.add(&known, &bogus),
            Err(FHEError::UnknownHandle(bogus))
        );
        assert!(algebra.decrypt(&bogus).is_err());
    }

    #[test]
    fn test_release() {
        let algebra = DevAlgebra::new();
        let a = algebra.encrypt(5).unwrap();
        let b = algebra.encrypt(6).unwrap();
        let cond = algebra.ge(&a, &b).unwrap();

        algebra.release(&[a]);
        algebra.release_bool(&cond);
        assert_eq!(algebra.len(), 1);
        assert_eq!(algebra.decrypt(&a), Err(FHEError::UnknownHandle(a)));
        assert!(algebra.select(&cond, &b, &b).is_err());

        // Releasing twice is harmless
        algebra.release(&[a]);
        assert_eq!(algebra.decrypt(&b).unwrap(), 6);
    }

    #[test]
    fn test_store_roundtrip() {
        let algebra = DevAlgebra::new();
        let handle = algebra.encrypt(42).unwrap();

        let bytes = bincode::serialize(&algebra.store()).unwrap();
        let restored = DevAlgebra::from_store(bincode::deserialize(&bytes).unwrap());
        assert_eq!(restored.decrypt(&handle).unwrap(), 42);

        // Nonce carries over so new handles never collide with old ones
        let next = restored.encrypt(42).unwrap();
        assert_ne!(next, handle);
    }
}
