//! Host command error types.

use clef_keys::KeyError;
use thiserror::Error;

/// Errors reported by host commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Command invoked with the wrong number of arguments.
    #[error("wrong # args: should be \"{command} {usage}\"")]
    WrongNumArgs {
        /// Name the command was invoked under.
        command: String,
        /// Expected argument synopsis.
        usage: &'static str,
    },

    /// An argument could not be converted to the required type.
    #[error("expected {expected} but got \"{got}\"")]
    InvalidArgumentType {
        /// Description of the expected type.
        expected: &'static str,
        /// The offending argument, as text.
        got: String,
    },

    /// No command is registered under this name.
    #[error("invalid command name \"{0}\"")]
    UnknownCommand(String),

    /// The cipher could not be registered.
    #[error("failed to register {0} cipher")]
    RegistrationFailed(String),

    /// Key handle or cipher failure.
    #[error(transparent)]
    Key(#[from] KeyError),
}

impl HostError {
    /// Machine-readable error code, most general element first.
    ///
    /// Always starts with `CLEF` followed by a category, e.g.
    /// `["CLEF", "SYMKEY", "UNKNOWN", "aeskey3"]`.
    pub fn error_code(&self) -> Vec<String> {
        let parts: Vec<&str> = match self {
            Self::WrongNumArgs { command, .. } => vec!["ARGS", "COUNT", command.as_str()],
            Self::InvalidArgumentType { expected, .. } => vec!["ARGS", "TYPE", *expected],
            Self::UnknownCommand(name) => vec!["LOOKUP", "COMMAND", name.as_str()],
            Self::RegistrationFailed(name) => vec!["REGISTER", name.as_str()],
            Self::Key(err @ KeyError::BlockLengthMismatch { .. }) => {
                let which = if err.is_block_too_short() { "SHORT" } else { "LONG" };
                vec!["BLOCK", which]
            },
            Self::Key(KeyError::UnknownHandle(handle)) => vec!["SYMKEY", "UNKNOWN", handle.as_str()],
            Self::Key(KeyError::DuplicateHandle(handle)) => vec!["SYMKEY", "DUPLICATE", handle.as_str()],
            Self::Key(KeyError::SerialsExhausted(algorithm)) => vec!["SYMKEY", "EXHAUSTED", *algorithm],
            Self::Key(KeyError::Algorithm(err)) => vec!["CIPHER", err.code()],
        };

        std::iter::once("CLEF")
            .chain(parts)
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clef_cipher::CipherError;

    use super::*;

    #[test]
    fn test_messages() {
        let err = HostError::WrongNumArgs {
            command: "clef::aes_done".into(),
            usage: "symkey",
        };
        assert_eq!(
            err.to_string(),
            "wrong # args: should be \"clef::aes_done symkey\""
        );

        let err = HostError::InvalidArgumentType {
            expected: "non-negative integer",
            got: "-1".into(),
        };
        assert_eq!(
            err.to_string(),
            "expected non-negative integer but got \"-1\""
        );

        let err = HostError::from(KeyError::UnknownHandle("aeskey1".into()));
        assert_eq!(err.to_string(), "invalid symkey provided: aeskey1");
    }

    #[test]
    fn test_error_codes() {
        let short = HostError::from(KeyError::BlockLengthMismatch {
            expected: 8,
            actual: 7,
        });
        assert_eq!(short.error_code(), vec!["CLEF", "BLOCK", "SHORT"]);

        let long = HostError::from(KeyError::BlockLengthMismatch {
            expected: 8,
            actual: 9,
        });
        assert_eq!(long.error_code(), vec!["CLEF", "BLOCK", "LONG"]);

        let exhausted = HostError::from(KeyError::SerialsExhausted("aes"));
        assert_eq!(exhausted.error_code(), vec!["CLEF", "SYMKEY", "EXHAUSTED", "aes"]);

        let cipher = HostError::from(KeyError::Algorithm(CipherError::InvalidRounds(3)));
        assert_eq!(
            cipher.error_code(),
            vec!["CLEF", "CIPHER", "INVALID_ROUNDS"]
        );

        let unknown = HostError::UnknownCommand("nope".into());
        assert_eq!(unknown.error_code(), vec!["CLEF", "LOOKUP", "COMMAND", "nope"]);
    }
}
