//! AES block cipher whose key schedule never lives in ordinary memory.
//!
//! A [`GuardedAes`] handle is built in one pass:
//! - the raw key is copied into a sealed protected region,
//! - expanded into encryption and decryption schedules held in writable
//!   protected regions,
//! - the key region is wiped and released,
//! - both schedules are sealed read-only.
//!
//! The handle then encrypts and decrypts single 16-byte blocks from the
//! sealed schedules until [`GuardedAes::destroy`] wipes them. Any failure
//! during setup releases every region created so far.
//!
//! ```rust
//! use aesguard::{new_cipher, CipherError, BLOCK_SIZE};
//!
//! fn example() -> Result<(), CipherError> {
//!     let mut cipher = new_cipher(&[0u8; 16])?;
//!
//!     let mut ct = [0u8; BLOCK_SIZE];
//!     cipher.encrypt(&mut ct, &[0u8; BLOCK_SIZE])?;
//!     assert_eq!(ct[..4], [0x66u8, 0xe9, 0x4b, 0xd4]);
//!
//!     cipher.destroy();
//!     assert_eq!(cipher.encrypt(&mut ct, &[0u8; BLOCK_SIZE]), Err(CipherError::UseAfterDestroy));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![deny(missing_docs)]

mod cipher;
mod error;
mod schedule;
mod traits;

pub use aes_core::{KeySize, BLOCK_SIZE};
pub use aesguard_mem::{disable_core_dumps, Allocator, Region, SystemAllocator, SystemRegion};

pub use crate::cipher::GuardedAes;
pub use crate::error::CipherError;
pub use crate::schedule::{build_schedules, Schedules};
pub use crate::traits::{destroy, BlockCipher, Destroyable};

/// Creates a cipher for a 16, 24 or 32 byte key.
///
/// Equivalent to [`GuardedAes::new`].
pub fn new_cipher(key: &[u8]) -> Result<GuardedAes, CipherError> {
    GuardedAes::new(key)
}
