//! Untyped command values.

use std::fmt;

use crate::error::HostError;

/// A value passed to or returned from a host command.
///
/// Conversions are lenient: any value can be read as bytes or as text, and
/// strings holding a decimal number can be read as integers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// No result.
    #[default]
    Empty,
    /// Raw bytes. Rendered as lowercase hex.
    Bytes(Vec<u8>),
    /// Signed integer.
    Int(i64),
    /// Text.
    Str(String),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Reads the value as a byte string.
    ///
    /// Text and integers yield their UTF-8 representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes.clone(),
            Self::Str(s) => s.as_bytes().to_vec(),
            other => other.to_string().into_bytes(),
        }
    }

    /// Reads the value as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidArgumentType`] if the value is not an
    /// integer or a string holding one.
    pub fn as_int(&self) -> Result<i64, HostError> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Str(s) => s.trim().parse().map_err(|_| self.type_error("integer")),
            _ => Err(self.type_error("integer")),
        }
    }

    /// Reads the value as a non-negative integer that fits in `T`.
    pub fn as_unsigned<T: TryFrom<i64>>(&self) -> Result<T, HostError> {
        let n = self.as_int()?;
        T::try_from(n).map_err(|_| self.type_error("non-negative integer"))
    }

    /// Returns true for [`Value::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn type_error(&self, expected: &'static str) -> HostError {
        HostError::InvalidArgumentType {
            expected,
            got: self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bytes(bytes) => f.write_str(&hex::encode(bytes)),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    let text = item.to_string();
                    if text.is_empty() || text.contains(char::is_whitespace) {
                        write!(f, "{{{text}}}")?;
                    } else {
                        f.write_str(&text)?;
                    }
                }
                Ok(())
            },
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}
