//! Cipher commands.
//!
//! One [`CipherCommand`] per (algorithm, operation) pair. Each validates its
//! argument count and types, converts the untyped arguments and forwards to
//! the typed operation on its algorithm binding.

use clef_cipher::KeyMaterial;
use clef_keys::BindingRef;

use crate::env::CommandHandler;
use crate::error::HostError;
use crate::value::Value;

/// The five operations registered for every algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `setup key ?rounds?` returns a new handle.
    Setup,
    /// `ecb_encrypt bytes symkey` returns one encrypted block.
    EcbEncrypt,
    /// `ecb_decrypt bytes symkey` returns one decrypted block.
    EcbDecrypt,
    /// `done symkey` releases a handle.
    Done,
    /// `keysize keysize` returns the normalized key length.
    Keysize,
}

impl Operation {
    /// All operations, in registration order.
    pub const ALL: [Operation; 5] = [
        Operation::Setup,
        Operation::EcbEncrypt,
        Operation::EcbDecrypt,
        Operation::Done,
        Operation::Keysize,
    ];

    /// Suffix of the command name.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::EcbEncrypt => "ecb_encrypt",
            Self::EcbDecrypt => "ecb_decrypt",
            Self::Done => "done",
            Self::Keysize => "keysize",
        }
    }

    /// Argument synopsis shown in usage errors.
    pub fn usage(self) -> &'static str {
        match self {
            Self::Setup => "key ?rounds?",
            Self::EcbEncrypt | Self::EcbDecrypt => "bytes symkey",
            Self::Done => "symkey",
            Self::Keysize => "keysize",
        }
    }

    fn accepts_arity(self, count: usize) -> bool {
        match self {
            Self::Setup => (1..=2).contains(&count),
            Self::EcbEncrypt | Self::EcbDecrypt => count == 2,
            Self::Done | Self::Keysize => count == 1,
        }
    }
}

/// Host command bound to one operation of one algorithm.
#[derive(Debug)]
pub struct CipherCommand {
    operation: Operation,
    binding: BindingRef,
}

impl CipherCommand {
    /// Creates a command holding `binding` for as long as it is registered.
    pub fn new(operation: Operation, binding: BindingRef) -> Self {
        Self { operation, binding }
    }
}

impl CommandHandler for CipherCommand {
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        if !self.operation.accepts_arity(args.len()) {
            return Err(HostError::WrongNumArgs {
                command: name.to_string(),
                usage: self.operation.usage(),
            });
        }

        match (self.operation, args) {
            (Operation::Setup, [key, rest @ ..]) => {
                let rounds = rest.first().map(Value::as_unsigned::<u32>).transpose()?;
                let key = KeyMaterial::new(key.to_bytes());
                let handle = self.binding.setup(key.as_bytes(), rounds)?;
                Ok(Value::Str(handle.to_string()))
            },
            (Operation::EcbEncrypt, [block, handle]) => {
                let out = self
                    .binding
                    .ecb_encrypt(&block.to_bytes(), &handle.to_string())?;
                Ok(Value::Bytes(out))
            },
            (Operation::EcbDecrypt, [block, handle]) => {
                let out = self
                    .binding
                    .ecb_decrypt(&block.to_bytes(), &handle.to_string())?;
                Ok(Value::Bytes(out))
            },
            (Operation::Done, [handle]) => {
                self.binding.done(&handle.to_string())?;
                Ok(Value::Empty)
            },
            (Operation::Keysize, [requested]) => {
                // Negative sizes fall below every minimum.
                let requested = match requested.as_int()? {
                    n if n < 0 => 0,
                    n => usize::try_from(n).unwrap_or(usize::MAX),
                };
                let size = self.binding.keysize(requested)?;
                Ok(Value::from(size))
            },
            _ => Err(HostError::WrongNumArgs {
                command: name.to_string(),
                usage: self.operation.usage(),
            }),
        }
    }
}
