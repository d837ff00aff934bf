//! TFHE-rs backend
//!
//! Real `FheUint64` ciphertexts behind the handle interface.

mod algebra;
mod keys;

pub use algebra::TfheAlgebra;
pub use keys::KeyPair;
