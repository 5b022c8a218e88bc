//! Algorithms compiled into this build.
//!
//! Each entry is gated on the cargo feature of the same family; a disabled
//! algorithm is simply absent from [`descriptors`].

use crate::descriptor::CipherDescriptor;
#[allow(unused_imports)]
use crate::{
    block::{BlockCipherDescriptor, EcbSchedule},
    descriptor::{KeySchedule, KeySizes},
    error::CipherError,
};

/// Accepts `0` or exactly `implied`.
#[allow(dead_code)]
fn exactly(implied: u32, requested: u32) -> Option<u32> {
    (requested == 0 || requested == implied).then_some(implied)
}

#[allow(dead_code)]
fn sixteen_rounds(_key_len: usize, requested: u32) -> Option<u32> {
    exactly(16, requested)
}

// ============================================================================
// Blowfish
// ============================================================================

/// Blowfish, 64-bit block, 8 to 56 byte keys.
#[cfg(feature = "blowfish")]
pub static BLOWFISH: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "blowfish",
    id: 0,
    key_sizes: KeySizes::Range { min: 8, max: 56 },
    block_length: 8,
    default_rounds: 16,
    rounds: sixteen_rounds,
    schedule: EcbSchedule::<blowfish::Blowfish>::fixed_rounds,
};

// ============================================================================
// XTEA
// ============================================================================

#[cfg(feature = "xtea")]
fn xtea_rounds(_key_len: usize, requested: u32) -> Option<u32> {
    exactly(crate::soft::xtea::CYCLES, requested)
}

/// XTEA, 64-bit block, 128-bit key, 32 cycles.
#[cfg(feature = "xtea")]
pub static XTEA: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "xtea",
    id: 1,
    key_sizes: KeySizes::Discrete(&[16]),
    block_length: 8,
    default_rounds: 32,
    rounds: xtea_rounds,
    schedule: EcbSchedule::<crate::soft::xtea::Xtea>::fixed_rounds,
};

// ============================================================================
// RC2
// ============================================================================

/// RC2, 64-bit block, 8 to 128 byte keys.
#[cfg(feature = "rc2")]
pub static RC2: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "rc2",
    id: 12,
    key_sizes: KeySizes::Range { min: 8, max: 128 },
    block_length: 8,
    default_rounds: 16,
    rounds: sixteen_rounds,
    schedule: EcbSchedule::<rc2::Rc2>::fixed_rounds,
};

// ============================================================================
// RC5
// ============================================================================

/// 12 by default, anything from 12 to 24 on request.
#[cfg(feature = "rc5")]
fn rc5_rounds(_key_len: usize, requested: u32) -> Option<u32> {
    match requested {
        0 => Some(12),
        n if crate::soft::rc5::ROUNDS.contains(&n) => Some(n),
        _ => None,
    }
}

#[cfg(feature = "rc5")]
fn rc5_schedule(key: &[u8], rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError> {
    Ok(EcbSchedule::wrap(crate::soft::rc5::Rc5::new(key, rounds)?))
}

/// RC5-32, 64-bit block, 8 to 128 byte keys.
#[cfg(feature = "rc5")]
pub static RC5: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "rc5",
    id: 2,
    key_sizes: KeySizes::Range { min: 8, max: 128 },
    block_length: 8,
    default_rounds: 12,
    rounds: rc5_rounds,
    schedule: rc5_schedule,
};

// ============================================================================
// AES / Rijndael
// ============================================================================

#[cfg(feature = "aes")]
const AES_KEY_SIZES: KeySizes = KeySizes::Discrete(&[16, 24, 32]);

/// 10, 12 or 14 rounds for 128, 192 or 256-bit keys.
#[cfg(feature = "aes")]
fn aes_rounds(key_len: usize, requested: u32) -> Option<u32> {
    exactly((key_len / 4 + 6) as u32, requested)
}

#[cfg(feature = "aes")]
fn aes_schedule(key: &[u8], _rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError> {
    match key.len() {
        16 => EcbSchedule::<aes::Aes128>::boxed(key),
        24 => EcbSchedule::<aes::Aes192>::boxed(key),
        32 => EcbSchedule::<aes::Aes256>::boxed(key),
        len => Err(CipherError::InvalidKeySize(len)),
    }
}

/// Rijndael with a 128-bit block (same primitive as [`AES`]).
#[cfg(feature = "aes")]
pub static RIJNDAEL: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "rijndael",
    id: 6,
    key_sizes: AES_KEY_SIZES,
    block_length: 16,
    default_rounds: 10,
    rounds: aes_rounds,
    schedule: aes_schedule,
};

/// AES-128/192/256.
#[cfg(feature = "aes")]
pub static AES: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "aes",
    id: 6,
    key_sizes: AES_KEY_SIZES,
    block_length: 16,
    default_rounds: 10,
    rounds: aes_rounds,
    schedule: aes_schedule,
};

// ============================================================================
// Twofish
// ============================================================================

/// Twofish, 128-bit block, 128/192/256-bit keys.
#[cfg(feature = "twofish")]
pub static TWOFISH: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "twofish",
    id: 7,
    key_sizes: KeySizes::Discrete(&[16, 24, 32]),
    block_length: 16,
    default_rounds: 16,
    rounds: sixteen_rounds,
    schedule: EcbSchedule::<twofish::Twofish>::fixed_rounds,
};

// ============================================================================
// DES / Triple-DES
// ============================================================================

/// Single DES, 64-bit key including parity bits.
#[cfg(feature = "des")]
pub static DES: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "des",
    id: 13,
    key_sizes: KeySizes::Discrete(&[8]),
    block_length: 8,
    default_rounds: 16,
    rounds: sixteen_rounds,
    schedule: EcbSchedule::<des::Des>::fixed_rounds,
};

#[cfg(feature = "des")]
fn des3_schedule(key: &[u8], _rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError> {
    match key.len() {
        16 => EcbSchedule::<des::TdesEde2>::boxed(key),
        24 => EcbSchedule::<des::TdesEde3>::boxed(key),
        len => Err(CipherError::InvalidKeySize(len)),
    }
}

/// Triple-DES EDE with two (16 byte) or three (24 byte) keys.
#[cfg(feature = "des")]
pub static DES3: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "des3",
    id: 14,
    key_sizes: KeySizes::Discrete(&[16, 24]),
    block_length: 8,
    default_rounds: 16,
    rounds: sixteen_rounds,
    schedule: des3_schedule,
};

// ============================================================================
// CAST5
// ============================================================================

/// 12 rounds by default for keys of 80 bits or less, 16 otherwise.
/// Short keys may ask for 16; long keys never run 12.
#[cfg(feature = "cast5")]
fn cast5_rounds(key_len: usize, requested: u32) -> Option<u32> {
    match (requested, key_len) {
        (0, ..=10) | (12, ..=10) => Some(12),
        (0 | 16, _) => Some(16),
        _ => None,
    }
}

/// A key shorter than 11 bytes runs 12 rounds unless padded to 16 bytes,
/// which leaves the subkeys unchanged and selects the full 16 rounds.
#[cfg(feature = "cast5")]
fn cast5_schedule(key: &[u8], rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError> {
    if rounds == 16 && key.len() <= 10 {
        let mut padded = zeroize::Zeroizing::new([0u8; 16]);
        padded[..key.len()].copy_from_slice(key);
        return EcbSchedule::<cast5::Cast5>::boxed(&padded[..]);
    }
    EcbSchedule::<cast5::Cast5>::boxed(key)
}

/// CAST5 (CAST-128), 64-bit block, 5 to 16 byte keys.
#[cfg(feature = "cast5")]
pub static CAST5: BlockCipherDescriptor = BlockCipherDescriptor {
    name: "cast5",
    id: 15,
    key_sizes: KeySizes::Range { min: 5, max: 16 },
    block_length: 8,
    default_rounds: 16,
    rounds: cast5_rounds,
    schedule: cast5_schedule,
};

// ============================================================================
// Lookup
// ============================================================================

/// Returns every descriptor compiled into this build, in registration order.
pub fn descriptors() -> Vec<&'static dyn CipherDescriptor> {
    #[allow(unused_mut)]
    let mut all: Vec<&'static dyn CipherDescriptor> = Vec::new();

    #[cfg(feature = "blowfish")]
    all.push(&BLOWFISH);
    #[cfg(feature = "xtea")]
    all.push(&XTEA);
    #[cfg(feature = "rc2")]
    all.push(&RC2);
    #[cfg(feature = "rc5")]
    all.push(&RC5);
    #[cfg(feature = "aes")]
    {
        all.push(&RIJNDAEL);
        all.push(&AES);
    }
    #[cfg(feature = "twofish")]
    all.push(&TWOFISH);
    #[cfg(feature = "des")]
    {
        all.push(&DES);
        all.push(&DES3);
    }
    #[cfg(feature = "cast5")]
    all.push(&CAST5);

    all
}

/// Finds a compiled-in descriptor by algorithm name.
pub fn find(name: &str) -> Option<&'static dyn CipherDescriptor> {
    descriptors().into_iter().find(|d| d.info().name == name)
}
