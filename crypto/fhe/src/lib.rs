//! Shade FHE Runtime Interface
//!
//! Everything the confidential ledger needs from an FHE co-processor, and
//! nothing more. Values live in the co-processor and are referenced by
//! opaque 32-byte handles.
//!
//! # Key Features:
//! - `CipherAlgebra`: add, sub, encrypted `>=` and homomorphic select over handles
//! - `Decryptor`: key-holder decryption, kept off the state-transition path
//! - Encrypted inputs: client-side encryption bound to a submitter and context
//!   by an input proof
//!
//! # Backends:
//! - `DevAlgebra`: in-memory, plaintext-tracking co-processor for local use
//! - `TfheAlgebra` (feature `tfhe`): real `FheUint64` ciphertexts via TFHE-rs

/// Parse `0x`-prefixed (or bare) hex into a fixed-size array.
pub(crate) fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], FHEError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| FHEError::InvalidHex(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| FHEError::InvalidHex(format!("expected {} bytes, got {}", N, b.len())))
}

/// Hex string in human-readable formats (TOML, JSON), raw bytes otherwise.
macro_rules! hex_serde {
    ($ty:ident, $len:expr) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    ::serde::Serialize::serialize(&self.0, serializer)
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                    s.parse().map_err(::serde::de::Error::custom)
                } else {
                    <[u8; $len] as ::serde::Deserialize>::deserialize(deserializer).map($ty)
                }
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::FHEError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::parse_fixed::<$len>(s).map($ty)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "0x{}", ::hex::encode(self.0))
            }
        }
    };
}

pub mod algebra;
pub mod dev;
pub mod errors;
pub mod handle;
pub mod input;

#[cfg(feature = "tfhe")]
mod real_impl;

pub use algebra::{CipherAlgebra, Decryptor};
pub use dev::{DevAlgebra, DevStore};
pub use errors::FHEError;
pub use handle::{Address, CiphertextHandle, EncryptedBool};
pub use input::{EncryptedInput, EncryptedInputBuilder, EncryptedInputProof, InputVerifierKey};

#[cfg(feature = "tfhe")]
pub use real_impl::*;

/// FHE Configuration
#[derive(Clone, Debug)]
pub struct FHEConfig {
    /// Security parameter (bits)
    pub security_bits: u32,
    /// Enable multi-threaded operations
    pub multi_threaded: bool,
}

impl Default for FHEConfig {
    fn default() -> Self {
        Self {
            security_bits: 128,
            multi_threaded: true,
        }
    }
}

/// Result type for FHE operations
pub type FHEResult<T> = Result<T, FHEError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FHEConfig::default();
        assert_eq!(config.security_bits, 128);
        assert!(config.multi_threaded);
    }

    #[test]
    fn test_parse_fixed() {
        let parsed: [u8; 2] = parse_fixed("0xabcd").unwrap();
        assert_eq!(parsed, [0xab, 0xcd]);
        assert!(parse_fixed::<2>("0xzz").is_err());
    }
}
