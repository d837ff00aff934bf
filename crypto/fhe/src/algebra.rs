//! Homomorphic algebra over ciphertext handles
//!
//! The ledger and registry only ever talk to the co-processor through these
//! traits. Every primitive is a pure function from handles to a fresh handle;
//! nothing is ever decrypted on this path.

use crate::handle::{CiphertextHandle, EncryptedBool};
use crate::FHEResult;

/// Encrypted u64 arithmetic exposed by the co-processor
pub trait CipherAlgebra: Send + Sync {
    /// Trivially encrypt a public constant
    fn encrypt(&self, value: u64) -> FHEResult<CiphertextHandle>;

    /// `a + b`, wrapping modulo 2^64
    fn add(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<CiphertextHandle>;

    /// `a - b`, wrapping modulo 2^64
    fn sub(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<CiphertextHandle>;

    /// Encrypted `a >= b`
    fn ge(&self, a: &CiphertextHandle, b: &CiphertextHandle) -> FHEResult<EncryptedBool>;

    /// `if cond { if_true } else { if_false }` without revealing `cond`
    fn select(
        &self,
        cond: &EncryptedBool,
        if_true: &CiphertextHandle,
        if_false: &CiphertextHandle,
    ) -> FHEResult<CiphertextHandle>;

    /// Drop ciphertexts that no stored state refers to any more. Unknown
    /// handles are ignored.
    fn release(&self, handles: &[CiphertextHandle]);

    /// Drop a consumed encrypted boolean
    fn release_bool(&self, cond: &EncryptedBool);
}

/// Key holder able to decrypt handles.
///
/// Only reachable through the ACL-gated user decryption path; the core
/// state transitions never take a `Decryptor`.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, handle: &CiphertextHandle) -> FHEResult<u64>;
}
