//! Typed key handles.
//!
//! Outside the crate a handle is just a string; inside, it is the pair of an
//! algorithm name and a serial number, so the registry never has to reason
//! about arbitrary text.

use std::fmt;

/// Separator between the algorithm name and the serial in a rendered handle.
pub const HANDLE_INFIX: &str = "key";

/// A handle identifying one key schedule of one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyHandle {
    algorithm: &'static str,
    serial: u64,
}

impl KeyHandle {
    /// Creates a handle for `algorithm` with the given serial.
    pub fn new(algorithm: &'static str, serial: u64) -> Self {
        Self { algorithm, serial }
    }

    /// Algorithm the handle belongs to.
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    /// Per-algorithm serial number.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Parses the rendered form of a handle for `algorithm`.
    ///
    /// Only the canonical rendering is accepted: `aeskey01` or `aeskey+1`
    /// never alias `aeskey1`.
    pub fn parse(algorithm: &'static str, text: &str) -> Option<Self> {
        let digits = text.strip_prefix(algorithm)?.strip_prefix(HANDLE_INFIX)?;

        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return None;
        }

        digits.parse().ok().map(|serial| Self::new(algorithm, serial))
    }
}

impl fmt::Display for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.algorithm, HANDLE_INFIX, self.serial)
    }
}
