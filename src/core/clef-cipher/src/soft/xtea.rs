//! XTEA with 32 cycles, big-endian word order.

use cipher::consts::{U16, U8};
use cipher::generic_array::GenericArray;
use cipher::{BlockCipher, Key, KeyInit, KeySizeUser};
use zeroize::{Zeroize, ZeroizeOnDrop};

const DELTA: u32 = 0x9e37_79b9;

/// Number of cycles (each cycle is two Feistel rounds).
pub const CYCLES: u32 = 32;

/// XTEA block cipher with a 128-bit key.
pub struct Xtea {
    k: [u32; 4],
}

impl BlockCipher for Xtea {}

impl KeySizeUser for Xtea {
    type KeySize = U16;
}

impl KeyInit for Xtea {
    fn new(key: &Key<Self>) -> Self {
        let mut k = [0u32; 4];
        for (word, chunk) in k.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { k }
    }
}

impl Drop for Xtea {
    fn drop(&mut self) {
        self.k.zeroize();
    }
}

impl ZeroizeOnDrop for Xtea {}

fn load(block: &GenericArray<u8, U8>) -> (u32, u32) {
    (
        u32::from_be_bytes([block[0], block[1], block[2], block[3]]),
        u32::from_be_bytes([block[4], block[5], block[6], block[7]]),
    )
}

fn store(block: &mut GenericArray<u8, U8>, v0: u32, v1: u32) {
    block[..4].copy_from_slice(&v0.to_be_bytes());
    block[4..].copy_from_slice(&v1.to_be_bytes());
}

cipher::impl_simple_block_encdec!(
    Xtea, U8, cipher, block,
    encrypt: {
        let k = &cipher.k;
        let (mut v0, mut v1) = load(block.get_in());
        let mut sum = 0u32;
        for _ in 0..CYCLES {
            v0 = v0.wrapping_add(
                (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1)) ^ sum.wrapping_add(k[(sum & 3) as usize]),
            );
            sum = sum.wrapping_add(DELTA);
            v1 = v1.wrapping_add(
                (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                    ^ sum.wrapping_add(k[((sum >> 11) & 3) as usize]),
            );
        }
        store(block.get_out(), v0, v1);
    }
    decrypt: {
        let k = &cipher.k;
        let (mut v0, mut v1) = load(block.get_in());
        let mut sum = DELTA.wrapping_mul(CYCLES);
        for _ in 0..CYCLES {
            v1 = v1.wrapping_sub(
                (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                    ^ sum.wrapping_add(k[((sum >> 11) & 3) as usize]),
            );
            sum = sum.wrapping_sub(DELTA);
            v0 = v0.wrapping_sub(
                (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1)) ^ sum.wrapping_add(k[(sum & 3) as usize]),
            );
        }
        store(block.get_out(), v0, v1);
    }
);
