//! Cipher descriptors.
//!
//! A descriptor is the read-only, process-wide record of one algorithm: its
//! identity, its key and block constraints, and the operations that act on
//! key schedules. Everything above this module (registry, bindings, host
//! commands) only ever talks to [`CipherDescriptor`] and [`KeySchedule`].

use serde::Serialize;

use crate::error::CipherError;

/// Static identity and constraints of a block cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CipherInfo {
    /// Unique algorithm name (e.g. `aes`).
    pub name: &'static str,
    /// Numeric algorithm identifier.
    pub id: u8,
    /// Smallest accepted key, in bytes.
    pub min_key_length: usize,
    /// Largest accepted key, in bytes.
    pub max_key_length: usize,
    /// Fixed block size, in bytes.
    pub block_length: usize,
    /// Round count used when the caller supplies none.
    pub default_rounds: u32,
}

/// Key lengths accepted by an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySizes {
    /// Any length in `min..=max`.
    Range {
        /// Smallest accepted length.
        min: usize,
        /// Largest accepted length.
        max: usize,
    },
    /// One of a fixed set of lengths, in ascending order.
    Discrete(&'static [usize]),
}

impl KeySizes {
    /// Smallest accepted key length.
    pub fn min(&self) -> usize {
        match *self {
            Self::Range { min, .. } => min,
            Self::Discrete(sizes) => sizes.first().copied().unwrap_or(0),
        }
    }

    /// Largest accepted key length.
    pub fn max(&self) -> usize {
        match *self {
            Self::Range { max, .. } => max,
            Self::Discrete(sizes) => sizes.last().copied().unwrap_or(0),
        }
    }

    /// Returns true if a key of `len` bytes can be scheduled as-is.
    pub fn accepts(&self, len: usize) -> bool {
        match *self {
            Self::Range { min, max } => (min..=max).contains(&len),
            Self::Discrete(sizes) => sizes.contains(&len),
        }
    }

    /// Normalizes a requested key length.
    ///
    /// Returns the largest supported length that does not exceed `requested`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeySize`] if `requested` is below the
    /// smallest supported length.
    pub fn normalize(&self, requested: usize) -> Result<usize, CipherError> {
        match *self {
            Self::Range { min, max } => {
                if requested < min {
                    Err(CipherError::InvalidKeySize(requested))
                } else {
                    Ok(requested.min(max))
                }
            },
            Self::Discrete(sizes) => sizes
                .iter()
                .rev()
                .copied()
                .find(|&size| size <= requested)
                .ok_or(CipherError::InvalidKeySize(requested)),
        }
    }
}

/// The capability set every block cipher exposes.
///
/// Implementations are registered once per process and never mutated.
pub trait CipherDescriptor: Send + Sync {
    /// Returns the algorithm's identity and constraints.
    fn info(&self) -> CipherInfo;

    /// Expands raw key bytes into a key schedule.
    ///
    /// `rounds == 0` selects the algorithm default for this key length.
    ///
    /// # Errors
    ///
    /// Returns an error if the key length or round count is not supported.
    fn setup(&self, key: &[u8], rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError>;

    /// Normalizes a requested key length to one the algorithm supports.
    fn keysize(&self, requested: usize) -> Result<usize, CipherError>;
}

/// Expanded key state produced by [`CipherDescriptor::setup`].
///
/// Transforms never mutate the schedule, so a schedule may be shared by
/// concurrent readers.
pub trait KeySchedule: Send + Sync {
    /// Encrypts exactly one block in place.
    fn ecb_encrypt(&self, block: &mut [u8]) -> Result<(), CipherError>;

    /// Decrypts exactly one block in place.
    fn ecb_decrypt(&self, block: &mut [u8]) -> Result<(), CipherError>;

    /// Releases algorithm resources held by the schedule.
    ///
    /// Called exactly once, right before the schedule is dropped.
    fn done(&mut self) {}
}
