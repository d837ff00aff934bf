//! Handle-addressed TFHE-rs co-processor

use std::collections::HashMap;

use parking_lot::RwLock;
use tfhe::prelude::*;
use tfhe::{set_server_key, FheBool, FheUint64};
use tracing::debug;

use super::keys::KeyPair;
use crate::algebra::{CipherAlgebra, Decryptor};
use crate::handle::{CiphertextHandle, EncryptedBool};
use crate::{FHEError, FHEResult};

#[derive(Default)]
struct Registry {
    values: HashMap<CiphertextHandle, FheUint64>,
    bools: HashMap<EncryptedBool, FheBool>,
    nonce: u64,
}

impl Registry {
    fn next_id(&mut self, op: &str) -> [u8; 32] {
        self.nonce += 1;
        let mut hasher = blake3::Hasher::new_derive_key("shade tfhe co-processor handle v1");
        hasher.update(op.as_bytes());
        hasher.update(&self.nonce.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    fn value(&self, handle: &CiphertextHandle) -> FHEResult<&FheUint64> {
        self.values.get(handle).ok_or(FHEError::UnknownHandle(*handle))
    }

    fn insert(&mut self, op: &str, ct: FheUint64) -> CiphertextHandle {
        let handle = CiphertextHandle(self.next_id(op));
        self.values.insert(handle, ct);
        handle
    }
}

/// TFHE-rs implementation of [`CipherAlgebra`]
pub struct TfheAlgebra {
    keys: KeyPair,
    registry: RwLock<Registry>,
}

impl TfheAlgebra {
    pub fn new(keys: KeyPair) -> Self {
        set_server_key(keys.server.clone());
        debug!("TFHE co-processor ready");
        Self {
            keys,
            registry: RwLock::new(Registry::default()),
        }
    }

    /// TFHE-rs keeps the server key thread-local
    fn bind_server_key(&self) {
        set_server_key(self.keys.server.clone());
    }
}

impl CipherAlgebra for TfheAlgebra {
    fn encrypt(&self, value: u64) -> FHEResult<CiphertextHandle> {
        let ct = FheUint64::try_encrypt(value, &self.keys.client)
            .map_err(|e| FHEError::EncryptionFailed(e.to_string()))?;
        Ok(self.registry.write().insert("encrypt", ct))
    }

    fn add(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<CiphertextHandle> {
        self.bind_server_key();
        let mut registry = self.registry.write();
        let sum = registry.value(a)? + registry.value(b)?;
        Ok(registry.insert("add", sum))
    }

    fn sub(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<CiphertextHandle> {
        self.bind_server_key();
        let mut registry = self.registry.write();
        let diff = registry.value(a)? - registry.value(b)?;
        Ok(registry.insert("sub", diff))
    }

    fn ge(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<EncryptedBool> {
        self.bind_server_key();
        let mut registry = self.registry.write();
        let result = registry.value(a)?.ge(registry.value(b)?);
        let handle = EncryptedBool(registry.next_id("ge"));
        registry.bools.insert(handle, result);
        Ok(handle)
    }

    fn select(
        &self,
        cond: &EncryptedBool,
        if_true: &CiphertextHandle,
        if_false: &CiphertextHandle,
    ) -> FHEResult<CiphertextHandle> {
        self.bind_server_key();
        let mut registry = self.registry.write();
        let flag = registry
            .bools
            .get(cond)
            .ok_or_else(|| FHEError::UnknownBool(cond.short()))?;
        let chosen = flag.if_then_else(registry.value(if_true)?, registry.value(if_false)?);
        Ok(registry.insert("select", chosen))
    }

    fn release(&self, handles: &[CiphertextHandle]) {
        let mut registry = self.registry.write();
        for handle in handles {
            registry.values.remove(handle);
        }
    }

    fn release_bool(&self, cond: &EncryptedBool) {
        self.registry.write().bools.remove(cond);
    }
}

impl Decryptor for TfheAlgebra {
    fn decrypt(&self, handle: &CiphertextHandle) -> FHEResult<u64> {
        let registry = self.registry.read();
        let value: u64 = registry.value(handle)?.decrypt(&self.keys.client);
        Ok(value)
    }
}
