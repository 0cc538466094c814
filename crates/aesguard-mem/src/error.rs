//! Error types for aesguard-mem.

use thiserror::Error;

use crate::state::RegionState;

/// Errors from page syscalls.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    /// Mapping fresh pages failed.
    #[error("mmap failed")]
    Create,

    /// Locking pages into RAM failed, usually RLIMIT_MEMLOCK.
    #[error("mlock failed")]
    Lock,

    /// Sealing pages read-only failed.
    #[error("mprotect(PROT_READ) failed")]
    Protect,

    /// Making sealed pages writable again failed.
    #[error("mprotect(PROT_READ | PROT_WRITE) failed")]
    Unprotect,
}

/// Errors that can occur when working with protected regions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// The platform could not map, lock or protect the requested memory.
    #[error("allocation failed: {0}")]
    Allocation(#[from] PageError),

    /// The operation is not allowed in the region's current state.
    #[error("cannot {operation} a {state} region")]
    State {
        /// What the caller tried to do.
        operation: &'static str,
        /// State the region was in.
        state: RegionState,
    },
}

impl MemoryError {
    pub(crate) fn state(operation: &'static str, state: RegionState) -> Self {
        Self::State { operation, state }
    }

    /// Returns true for failures of the underlying memory capability.
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation(_))
    }
}
