//! Cryptographically secure random generation.
//!
//! Uses the operating system's CSPRNG for all random number generation.

use rand::{rngs::OsRng, RngCore};

use crate::descriptor::CipherDescriptor;
use crate::error::CipherError;
use crate::keys::KeyMaterial;

/// Generates `len` random key bytes.
pub fn generate_key(len: usize) -> KeyMaterial {
    KeyMaterial::new(generate_bytes(len))
}

/// Generates a random key of a length the given cipher accepts.
///
/// `requested` is normalized with the descriptor's keysize rule; `None`
/// selects the largest supported key.
///
/// # Errors
///
/// Returns an error if `requested` is below the algorithm's minimum.
pub fn generate_key_for(
    descriptor: &dyn CipherDescriptor,
    requested: Option<usize>,
) -> Result<KeyMaterial, CipherError> {
    let len = descriptor.keysize(requested.unwrap_or(descriptor.info().max_key_length))?;
    Ok(generate_key(len))
}

/// Generates cryptographically secure random bytes.
pub fn generate_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
