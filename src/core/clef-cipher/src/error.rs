//! Cipher error types.

use thiserror::Error;

/// Errors reported by a block cipher primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Key length not supported by the algorithm.
    #[error("invalid key size given: {0} bytes")]
    InvalidKeySize(usize),

    /// Round count not supported for this algorithm and key length.
    #[error("invalid number of rounds given: {0}")]
    InvalidRounds(u32),

    /// Block does not match the algorithm's block length.
    #[error("invalid block length: {0} bytes")]
    InvalidBlockLength(usize),
}

impl CipherError {
    /// Returns a stable, machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidKeySize(_) => "INVALID_KEYSIZE",
            Self::InvalidRounds(_) => "INVALID_ROUNDS",
            Self::InvalidBlockLength(_) => "INVALID_BLOCK_LENGTH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            CipherError::InvalidKeySize(3),
            CipherError::InvalidRounds(7),
            CipherError::InvalidBlockLength(15),
        ];
        let mut codes: Vec<_> = errors.iter().map(CipherError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CipherError::InvalidKeySize(3).to_string(),
            "invalid key size given: 3 bytes"
        );
        assert_eq!(
            CipherError::InvalidRounds(7).to_string(),
            "invalid number of rounds given: 7"
        );
    }
}
