//! Descriptors backed by RustCrypto block ciphers.
//!
//! [`BlockCipherDescriptor`] is a plain table entry: constraints plus two
//! function pointers (round policy and schedule constructor). [`EcbSchedule`]
//! adapts any `cipher` 0.4 block cipher to the [`KeySchedule`] trait.

use cipher::generic_array::GenericArray;
use cipher::{Block, BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit};

use crate::descriptor::{CipherDescriptor, CipherInfo, KeySchedule, KeySizes};
use crate::error::CipherError;

/// Builds a key schedule from a validated key and the resolved round count.
pub type ScheduleFn = fn(&[u8], u32) -> Result<Box<dyn KeySchedule>, CipherError>;

/// Resolves a requested round count for a key length.
///
/// `0` asks for the default. Returns `None` when the algorithm cannot run
/// that many rounds with a key of this length.
pub type RoundsFn = fn(usize, u32) -> Option<u32>;

/// A static descriptor for one block cipher.
#[derive(Clone, Copy)]
pub struct BlockCipherDescriptor {
    /// Unique algorithm name.
    pub name: &'static str,
    /// Numeric algorithm identifier.
    pub id: u8,
    /// Accepted key lengths.
    pub key_sizes: KeySizes,
    /// Block size in bytes.
    pub block_length: usize,
    /// Round count reported when none is requested.
    pub default_rounds: u32,
    /// Round policy.
    pub rounds: RoundsFn,
    /// Key schedule constructor.
    pub schedule: ScheduleFn,
}

impl CipherDescriptor for BlockCipherDescriptor {
    fn info(&self) -> CipherInfo {
        CipherInfo {
            name: self.name,
            id: self.id,
            min_key_length: self.key_sizes.min(),
            max_key_length: self.key_sizes.max(),
            block_length: self.block_length,
            default_rounds: self.default_rounds,
        }
    }

    fn setup(&self, key: &[u8], rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError> {
        if !self.key_sizes.accepts(key.len()) {
            return Err(CipherError::InvalidKeySize(key.len()));
        }

        let resolved =
            (self.rounds)(key.len(), rounds).ok_or(CipherError::InvalidRounds(rounds))?;

        (self.schedule)(key, resolved)
    }

    fn keysize(&self, requested: usize) -> Result<usize, CipherError> {
        self.key_sizes.normalize(requested)
    }
}

/// Key schedule wrapping a RustCrypto block cipher instance.
///
/// The wrapped cipher is zeroized when the schedule is dropped.
pub struct EcbSchedule<C> {
    cipher: C,
}

impl<C> EcbSchedule<C>
where
    C: KeyInit + BlockEncrypt + BlockDecrypt + Send + Sync + 'static,
{
    /// Schedules `key` and boxes the result as a [`KeySchedule`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeySize`] if the cipher rejects the key.
    pub fn boxed(key: &[u8]) -> Result<Box<dyn KeySchedule>, CipherError> {
        let cipher =
            C::new_from_slice(key).map_err(|_| CipherError::InvalidKeySize(key.len()))?;
        Ok(Self::wrap(cipher))
    }

    /// [`ScheduleFn`] for ciphers whose round count follows from the key.
    pub fn fixed_rounds(key: &[u8], _rounds: u32) -> Result<Box<dyn KeySchedule>, CipherError> {
        Self::boxed(key)
    }
}

impl<C> EcbSchedule<C>
where
    C: BlockEncrypt + BlockDecrypt + Send + Sync + 'static,
{
    /// Boxes an already keyed cipher.
    pub fn wrap(cipher: C) -> Box<dyn KeySchedule> {
        Box::new(Self { cipher })
    }
}

impl<C: BlockSizeUser> EcbSchedule<C> {
    fn block_mut(block: &mut [u8]) -> Result<&mut Block<C>, CipherError> {
        if block.len() != C::block_size() {
            return Err(CipherError::InvalidBlockLength(block.len()));
        }
        Ok(GenericArray::from_mut_slice(block))
    }
}

impl<C> KeySchedule for EcbSchedule<C>
where
    C: BlockEncrypt + BlockDecrypt + Send + Sync,
{
    fn ecb_encrypt(&self, block: &mut [u8]) -> Result<(), CipherError> {
        self.cipher.encrypt_block(Self::block_mut(block)?);
        Ok(())
    }

    fn ecb_decrypt(&self, block: &mut [u8]) -> Result<(), CipherError> {
        self.cipher.decrypt_block(Self::block_mut(block)?);
        Ok(())
    }
}
