//! # Clef Host
//!
//! Exposes every compiled-in block cipher as a set of named commands in a
//! [`CommandEnv`].
//!
//! For each algorithm, [`init_ciphers`] registers five commands
//! (`<namespace>::<algorithm>_setup`, `_ecb_encrypt`, `_ecb_decrypt`, `_done`
//! and `_keysize`) sharing one algorithm binding, and publishes a descriptive
//! record under `<namespace>::cipher(<algorithm>)`.
//!
//! Commands take and return untyped [`Value`]s; argument count and type
//! checking happen here, everything else is delegated to `clef-keys`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod record;
pub mod register;
pub mod value;

pub use config::HostConfig;
pub use dispatch::{CipherCommand, Operation};
pub use env::{CommandEnv, CommandHandler};
pub use error::HostError;
pub use record::CipherRecord;
pub use register::{init_ciphers, register_cipher, unregister_cipher};
pub use value::Value;
