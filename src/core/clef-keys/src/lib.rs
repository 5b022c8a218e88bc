//! # Clef Keys
//!
//! Key handles for block ciphers - callers set up a key once and address it
//! by an opaque handle afterwards.
//!
//! ## Features
//!
//! - Per-algorithm registry of live key schedules
//! - Process-unique handles (`<algorithm>key<n>`), never reused
//! - Single-block encrypt/decrypt against a handle
//! - Reference-counted algorithm bindings that drain their registry when the
//!   last operation entry point is released
//!
//! ## Handle Format
//!
//! Handles are rendered as `{algorithm}key{serial}`, e.g. `aeskey1`. The
//! serial counter is per algorithm, starts at 1 and only ever grows.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod binding;
pub mod error;
pub mod handle;
pub mod ops;
pub mod registry;

pub use binding::{AlgorithmBinding, BindingRef};
pub use error::KeyError;
pub use handle::KeyHandle;
pub use registry::KeyRegistry;
