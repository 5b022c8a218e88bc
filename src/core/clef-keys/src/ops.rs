//! Typed key operations on an algorithm binding.
//!
//! These are the five operations every algorithm supports: setup,
//! single-block encrypt/decrypt, done and keysize. Argument marshalling from
//! untyped host values happens one layer up; here everything is typed.

use clef_cipher::KeySchedule;
use tracing::debug;

use crate::binding::AlgorithmBinding;
use crate::error::KeyError;
use crate::handle::KeyHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl AlgorithmBinding {
    /// Schedules `key` and stores it under a new handle.
    ///
    /// `rounds` of `None` (or `Some(0)`) selects the algorithm default.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Algorithm`] if the cipher rejects the key or round
    /// count. Nothing is stored on failure.
    pub fn setup(&self, key: &[u8], rounds: Option<u32>) -> Result<KeyHandle, KeyError> {
        let schedule = self.descriptor().setup(key, rounds.unwrap_or(0))?;
        let handle = self.registry().issue(schedule)?;

        debug!(handle = %handle, key_len = key.len(), "Key schedule created");

        Ok(handle)
    }

    /// Encrypts exactly one block with the schedule behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::BlockLengthMismatch`] if `block` is not exactly one
    /// cipher block (checked before the registry is consulted), or
    /// [`KeyError::UnknownHandle`] if the handle is not live.
    pub fn ecb_encrypt(&self, block: &[u8], handle: &str) -> Result<Vec<u8>, KeyError> {
        self.transform(block, handle, Direction::Encrypt)
    }

    /// Decrypts exactly one block with the schedule behind `handle`.
    ///
    /// Same contract as [`AlgorithmBinding::ecb_encrypt`].
    pub fn ecb_decrypt(&self, block: &[u8], handle: &str) -> Result<Vec<u8>, KeyError> {
        self.transform(block, handle, Direction::Decrypt)
    }

    /// Releases the schedule behind `handle`.
    pub fn done(&self, handle: &str) -> Result<(), KeyError> {
        self.registry().remove_and_release(handle).map(|_| ())
    }

    /// Normalizes a requested key length for this algorithm.
    pub fn keysize(&self, requested: usize) -> Result<usize, KeyError> {
        Ok(self.descriptor().keysize(requested)?)
    }

    fn transform(
        &self,
        block: &[u8],
        handle: &str,
        direction: Direction,
    ) -> Result<Vec<u8>, KeyError> {
        let expected = self.descriptor().info().block_length;
        if block.len() != expected {
            return Err(KeyError::BlockLengthMismatch {
                expected,
                actual: block.len(),
            });
        }

        let output = self
            .registry()
            .with_schedule(handle, |schedule: &dyn KeySchedule| {
                let mut output = block.to_vec();
                match direction {
                    Direction::Encrypt => schedule.ecb_encrypt(&mut output),
                    Direction::Decrypt => schedule.ecb_decrypt(&mut output),
                }
                .map(|_| output)
            })??;

        Ok(output)
    }
}
