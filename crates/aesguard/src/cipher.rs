//! GuardedAes - block cipher handle over sealed schedule regions.

use core::fmt;

use aes_core::{decrypt_block, encrypt_block, Block, KeySize, BLOCK_SIZE};
use aesguard_mem::{Allocator, Region, SystemAllocator, SystemRegion};
use tracing::debug;

use crate::error::CipherError;
use crate::schedule::{build_schedules, Schedules};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Destroyed,
}

/// AES cipher whose round keys live in sealed protected regions.
///
/// `encrypt` and `decrypt` borrow the handle immutably and may run from many
/// threads at once. `destroy` needs `&mut self`, so it can never overlap an
/// in-flight block operation. After `destroy` every block operation fails
/// with [`CipherError::UseAfterDestroy`].
///
/// Call [`destroy`](Self::destroy) explicitly once the key is no longer
/// needed. Dropping the handle also destroys it, so an early return or a
/// panic never leaves the schedules behind.
pub struct GuardedAes<R: Region = SystemRegion> {
    enc: R,
    dec: R,
    key_size: KeySize,
    lifecycle: Lifecycle,
}

impl GuardedAes<SystemRegion> {
    /// Creates a cipher for a 16, 24 or 32 byte key using the system allocator.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Self::with_allocator(&SystemAllocator::default(), key)
    }
}

impl<R: Region> GuardedAes<R> {
    /// Creates a cipher whose schedules come from `alloc`.
    pub fn with_allocator<A>(alloc: &A, key: &[u8]) -> Result<Self, CipherError>
    where
        A: Allocator<Region = R>,
    {
        let Schedules { enc, dec, key_size } = build_schedules(alloc, key)?;
        Ok(Self {
            enc,
            dec,
            key_size,
            lifecycle: Lifecycle::Active,
        })
    }

    /// Size of the key this cipher was built from.
    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// Block size in bytes, always 16.
    pub fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Returns true once [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    /// Encrypts the first block of `src` into the first block of `dst`.
    pub fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), CipherError> {
        let (dst, src) = self.blocks(dst, src)?;
        encrypt_block(self.enc.as_words()?, dst, src)?;
        Ok(())
    }

    /// Decrypts the first block of `src` into the first block of `dst`.
    pub fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), CipherError> {
        let (dst, src) = self.blocks(dst, src)?;
        decrypt_block(self.dec.as_words()?, dst, src)?;
        Ok(())
    }

    /// Wipes and releases both schedules. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }

        self.enc.destroy();
        self.dec.destroy();
        self.lifecycle = Lifecycle::Destroyed;

        debug!(key_size = %self.key_size, "destroyed key schedules");
    }

    fn blocks<'d, 's>(
        &self,
        dst: &'d mut [u8],
        src: &'s [u8],
    ) -> Result<(&'d mut Block, &'s Block), CipherError> {
        if self.is_destroyed() {
            return Err(CipherError::UseAfterDestroy);
        }

        let src_len = src.len();
        let dst_len = dst.len();
        let src = src
            .first_chunk::<BLOCK_SIZE>()
            .ok_or(CipherError::ShortBuffer {
                buffer: "input",
                len: src_len,
            })?;
        let dst = dst
            .first_chunk_mut::<BLOCK_SIZE>()
            .ok_or(CipherError::ShortBuffer {
                buffer: "output",
                len: dst_len,
            })?;

        Ok((dst, src))
    }
}

impl<R: Region> Drop for GuardedAes<R> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<R: Region> fmt::Debug for GuardedAes<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedAes")
            .field("key_size", &self.key_size)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
