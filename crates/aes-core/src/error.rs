//! Error types for the key schedule and block transform.

use thiserror::Error;

/// Errors reported by [`expand_key`](crate::expand_key) and the block functions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AesError {
    /// Key length is not 16, 24 or 32 bytes.
    #[error("invalid key size {0}")]
    InvalidKeySize(usize),

    /// Output schedule buffer does not hold exactly one expanded schedule.
    #[error("schedule buffer holds {got} words, expected {expected}")]
    ScheduleLength {
        /// Words required by the key size.
        expected: usize,
        /// Words supplied by the caller.
        got: usize,
    },

    /// Schedule length does not correspond to any AES variant.
    #[error("schedule of {0} words does not match any AES variant")]
    UnsupportedSchedule(usize),
}
