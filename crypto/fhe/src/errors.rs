//! FHE Error types

use thiserror::Error;

use crate::handle::CiphertextHandle;

/// Errors raised by the encryption runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FHEError {
    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Handle does not reference a ciphertext held by this co-processor
    #[error("Unknown ciphertext handle: {0}")]
    UnknownHandle(CiphertextHandle),

    /// Handle does not reference an encrypted boolean held by this co-processor
    #[error("Unknown encrypted boolean: {0}")]
    UnknownBool(String),

    /// Malformed hex-encoded value
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}
