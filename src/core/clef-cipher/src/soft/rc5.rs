//! RC5-32 (64-bit block) with variable key length and round count.

use cipher::consts::U8;
use cipher::generic_array::GenericArray;
use cipher::BlockCipher;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CipherError;

const P32: u32 = 0xb7e1_5163;
const Q32: u32 = 0x9e37_79b9;

/// Accepted key lengths in bytes.
pub const KEY_LENGTHS: std::ops::RangeInclusive<usize> = 8..=128;

/// Accepted round counts.
pub const ROUNDS: std::ops::RangeInclusive<u32> = 12..=24;

/// RC5-32/r/b key schedule.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Rc5 {
    rounds: usize,
    s: Vec<u32>,
}

impl Rc5 {
    /// Expands `key` for `rounds` rounds.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeySize`] or [`CipherError::InvalidRounds`]
    /// when either parameter is outside the supported range.
    pub fn new(key: &[u8], rounds: u32) -> Result<Self, CipherError> {
        if !KEY_LENGTHS.contains(&key.len()) {
            return Err(CipherError::InvalidKeySize(key.len()));
        }
        if !ROUNDS.contains(&rounds) {
            return Err(CipherError::InvalidRounds(rounds));
        }

        let mut l = vec![0u32; key.len().div_ceil(4)];
        for (i, byte) in key.iter().enumerate() {
            l[i / 4] |= u32::from(*byte) << (8 * (i % 4));
        }

        let rounds = rounds as usize;
        let t = 2 * (rounds + 1);
        let mut s = Vec::with_capacity(t);
        s.push(P32);
        for i in 1..t {
            s.push(s[i - 1].wrapping_add(Q32));
        }

        let (mut a, mut b, mut i, mut j) = (0u32, 0u32, 0usize, 0usize);
        for _ in 0..3 * t.max(l.len()) {
            s[i] = s[i].wrapping_add(a).wrapping_add(b).rotate_left(3);
            a = s[i];
            l[j] = l[j].wrapping_add(a).wrapping_add(b).rotate_left(a.wrapping_add(b));
            b = l[j];
            i = (i + 1) % t;
            j = (j + 1) % l.len();
        }
        l.zeroize();

        Ok(Self { rounds, s })
    }
}

impl BlockCipher for Rc5 {}

fn load(block: &GenericArray<u8, U8>) -> (u32, u32) {
    (
        u32::from_le_bytes([block[0], block[1], block[2], block[3]]),
        u32::from_le_bytes([block[4], block[5], block[6], block[7]]),
    )
}

fn store(block: &mut GenericArray<u8, U8>, a: u32, b: u32) {
    block[..4].copy_from_slice(&a.to_le_bytes());
    block[4..].copy_from_slice(&b.to_le_bytes());
}

cipher::impl_simple_block_encdec!(
    Rc5, U8, cipher, block,
    encrypt: {
        let s = &cipher.s;
        let (a, b) = load(block.get_in());
        let (mut a, mut b) = (a.wrapping_add(s[0]), b.wrapping_add(s[1]));
        for r in 1..=cipher.rounds {
            a = (a ^ b).rotate_left(b).wrapping_add(s[2 * r]);
            b = (b ^ a).rotate_left(a).wrapping_add(s[2 * r + 1]);
        }
        store(block.get_out(), a, b);
    }
    decrypt: {
        let s = &cipher.s;
        let (mut a, mut b) = load(block.get_in());
        for r in (1..=cipher.rounds).rev() {
            b = b.wrapping_sub(s[2 * r + 1]).rotate_right(a) ^ a;
            a = a.wrapping_sub(s[2 * r]).rotate_right(b) ^ b;
        }
        store(block.get_out(), a.wrapping_sub(s[0]), b.wrapping_sub(s[1]));
    }
);
