//! FHE Key Management with TFHE-rs
//!
//! - ClientKey: encryption and decryption, held by the key ceremony
//! - ServerKey: homomorphic operations, held by the co-processor

use crate::{FHEConfig, FHEError, FHEResult};
use tfhe::{generate_keys, ConfigBuilder};
use tfhe::{ClientKey as TfheClientKey, ServerKey as TfheServerKey};

fn config_hash(config: &FHEConfig) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&config.security_bits.to_le_bytes());
    hasher.update(&[config.multi_threaded as u8]);
    *hasher.finalize().as_bytes()
}

/// Client and server keys generated together
#[derive(Clone)]
pub struct KeyPair {
    pub(crate) client: TfheClientKey,
    pub(crate) server: TfheServerKey,
    config_hash: [u8; 32],
}

impl KeyPair {
    /// Generate a new key pair
    ///
    /// WARNING: Key generation is slow (~10-30 seconds)
    pub fn generate(config: &FHEConfig) -> FHEResult<Self> {
        if config.security_bits < 128 {
            return Err(FHEError::KeyGenerationFailed(format!(
                "security parameter {} below 128 bits",
                config.security_bits
            )));
        }

        let (client, server) = generate_keys(ConfigBuilder::default().build());

        Ok(Self {
            client,
            server,
            config_hash: config_hash(config),
        })
    }

    /// Verify these keys were generated for `config`
    pub fn verify_config(&self, config: &FHEConfig) -> bool {
        self.config_hash == config_hash(config)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("config_hash", &hex::encode(&self.config_hash[..8]))
            .finish()
    }
}
