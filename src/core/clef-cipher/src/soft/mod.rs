//! Block ciphers with no `cipher` 0.4 crate covering their full parameter
//! range, implemented on the same trait family as the RustCrypto crates.

#[cfg(feature = "rc5")]
pub mod rc5;
#[cfg(feature = "xtea")]
pub mod xtea;
