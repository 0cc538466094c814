//! Capability traits shared by every cipher variant in this crate.

use core::any::Any;

use aesguard_mem::{HeapRegion, Region, SystemRegion};

use crate::cipher::GuardedAes;
use crate::error::CipherError;

/// Single-block cipher. Modes of operation are layered on top by the caller.
pub trait BlockCipher {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts the first block of `src` into the first block of `dst`.
    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), CipherError>;

    /// Decrypts the first block of `src` into the first block of `dst`.
    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), CipherError>;
}

/// Something holding key material that can be wiped on request.
pub trait Destroyable {
    /// Wipes and releases the key material. Idempotent.
    fn destroy(&mut self);

    /// Returns true once the key material is gone.
    fn is_destroyed(&self) -> bool;
}

impl<R: Region> BlockCipher for GuardedAes<R> {
    fn block_size(&self) -> usize {
        GuardedAes::block_size(self)
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), CipherError> {
        GuardedAes::encrypt(self, dst, src)
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) -> Result<(), CipherError> {
        GuardedAes::decrypt(self, dst, src)
    }
}

impl<R: Region> Destroyable for GuardedAes<R> {
    fn destroy(&mut self) {
        GuardedAes::destroy(self);
    }

    fn is_destroyed(&self) -> bool {
        GuardedAes::is_destroyed(self)
    }
}

/// Destroys a type-erased cipher handle.
///
/// Code that knows its cipher type should call [`Destroyable::destroy`]
/// instead; this exists for handles whose concrete type is unknown.
/// Returns [`CipherError::NotASupportedCipher`] for anything that is not a
/// [`GuardedAes`] over a system or heap region. A `GuardedAes` built on any
/// other region type is not recognised here either and is left untouched;
/// destroy those through [`Destroyable`] or by dropping them.
pub fn destroy(handle: &mut dyn Any) -> Result<(), CipherError> {
    if let Some(cipher) = handle.downcast_mut::<GuardedAes<SystemRegion>>() {
        cipher.destroy();
        return Ok(());
    }

    if let Some(cipher) = handle.downcast_mut::<GuardedAes<HeapRegion>>() {
        cipher.destroy();
        return Ok(());
    }

    Err(CipherError::NotASupportedCipher)
}
