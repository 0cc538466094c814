//! Reference AES implementation whose round keys live in caller-supplied word buffers.
//!
//! This crate follows FIPS-197 and provides:
//! - Key expansion for AES-128, AES-192 and AES-256 into 32-bit word schedules.
//! - The equivalent-inverse-cipher decryption schedule.
//! - Single-block encryption and decryption.
//!
//! Schedules are plain `&mut [u32]` slices so callers decide where the round
//! keys are stored. The implementation aims for clarity and testability rather
//! than constant-time guarantees; it should not be treated as side-channel
//! hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
mod key;
mod round;
mod sbox;

pub use crate::block::{Block, BLOCK_SIZE};
pub use crate::cipher::{decrypt_block, encrypt_block, expand_key};
pub use crate::error::AesError;
pub use crate::key::KeySize;
