//! # Clef Cipher
//!
//! Block cipher descriptors for Nubster Clef.
//!
//! This crate describes every block cipher compiled into the build through
//! one uniform capability set:
//! - Static identity and constraints ([`CipherInfo`])
//! - Key setup producing an opaque [`KeySchedule`]
//! - Single-block (ECB-style) encryption and decryption
//! - Key size normalization
//!
//! Most algorithms come from the RustCrypto block cipher crates; XTEA and
//! RC5 live in [`soft`]. Each is selected at compile time with a cargo
//! feature (`aes`, `blowfish`, `xtea`, `rc2`, `rc5`, `twofish`, `des`,
//! `cast5`).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod block;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod keys;
pub mod random;
pub mod soft;

pub use block::{BlockCipherDescriptor, EcbSchedule};
pub use descriptor::{CipherDescriptor, CipherInfo, KeySchedule, KeySizes};
pub use error::CipherError;
pub use keys::KeyMaterial;
