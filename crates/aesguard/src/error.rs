//! Error types for guarded ciphers.

use aes_core::AesError;
use aesguard_mem::MemoryError;
use thiserror::Error;

/// Errors returned by cipher construction, block operations and teardown.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// Key length is not 16, 24 or 32 bytes. Rejected before any allocation.
    #[error("invalid key size {0}")]
    InvalidKeySize(usize),

    /// The protected-memory capability could not satisfy a request.
    ///
    /// Every region created during the failed call has already been destroyed.
    #[error("protected memory unavailable: {0}")]
    Allocation(MemoryError),

    /// A region was used outside its lifecycle. Indicates a defect in this crate.
    #[error("region state violation: {0}")]
    State(MemoryError),

    /// The block primitive rejected a schedule. Indicates a defect in this crate.
    #[error("key schedule rejected: {0}")]
    Schedule(AesError),

    /// `dst` or `src` is shorter than one block. Nothing was written.
    #[error("{buffer} buffer holds {len} bytes, need a full block")]
    ShortBuffer {
        /// Which argument was short: `"input"` or `"output"`.
        buffer: &'static str,
        /// Length supplied.
        len: usize,
    },

    /// The cipher has been destroyed.
    #[error("cipher used after destroy")]
    UseAfterDestroy,

    /// The handle is not a cipher from this crate.
    #[error("handle is not an aesguard cipher")]
    NotASupportedCipher,
}

impl From<AesError> for CipherError {
    fn from(err: AesError) -> Self {
        match err {
            AesError::InvalidKeySize(len) => Self::InvalidKeySize(len),
            other => Self::Schedule(other),
        }
    }
}

impl From<MemoryError> for CipherError {
    fn from(err: MemoryError) -> Self {
        if err.is_allocation() {
            Self::Allocation(err)
        } else {
            Self::State(err)
        }
    }
}
