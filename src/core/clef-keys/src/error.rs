//! Key registry error types.

use thiserror::Error;

/// Errors that can occur while operating on key handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Input block is not exactly one cipher block long.
    #[error("bytes are {} than cipher block length", shorter_or_longer(.actual, .expected))]
    BlockLengthMismatch {
        /// Block length required by the algorithm.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Handle is not present in the registry.
    #[error("invalid symkey provided: {0}")]
    UnknownHandle(String),

    /// Handle generation produced a name that is already live.
    #[error("internal error: duplicate key name {0}")]
    DuplicateHandle(String),

    /// The registry has issued every serial it can represent.
    #[error("no key handles left for {0}")]
    SerialsExhausted(&'static str),

    /// The cipher primitive rejected the operation.
    #[error(transparent)]
    Algorithm(#[from] clef_cipher::CipherError),
}

fn shorter_or_longer(actual: &usize, expected: &usize) -> &'static str {
    if actual < expected {
        "shorter"
    } else {
        "longer"
    }
}

impl KeyError {
    /// Returns true if the block was too short (as opposed to too long).
    pub fn is_block_too_short(&self) -> bool {
        matches!(self, Self::BlockLengthMismatch { expected, actual } if actual < expected)
    }
}
