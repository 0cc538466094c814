//! Protected memory regions for short-lived secrets and sealed key material.
//!
//! A region moves through a one-way lifecycle:
//!
//! - **Writable**: freshly allocated and zero-filled; a word view can be
//!   borrowed mutably to populate it.
//! - **ReadOnly**: sealed; any further write is a [`MemoryError::State`].
//! - **Destroyed**: wiped with zeros and released; reads fail.
//!
//! # Region Types
//!
//! ## LockedRegion (Unix only)
//!
//! - `mmap` for allocation, rounded up to whole pages
//! - `mlock` to prevent swapping to disk (failure is an allocation error)
//! - `madvise(MADV_DONTDUMP)` on Linux, best-effort
//! - `mprotect(PROT_READ)` when sealed
//!
//! ## HeapRegion
//!
//! Portable fallback with the same lifecycle and zero-on-destroy, without
//! OS-level protection.
//!
//! Both allocators disable core dumps for the whole process on first use
//! (see [`disable_core_dumps`]).
//!
//! # Example
//!
//! ```rust
//! use aesguard_mem::{Allocator, MemoryError, Region, RegionState, SystemAllocator};
//!
//! fn example() -> Result<(), MemoryError> {
//!     let mut region = SystemAllocator::default().allocate_mutable(16)?;
//!     region.as_words_mut()?.copy_from_slice(&[1, 2, 3, 4]);
//!     region.seal()?;
//!
//!     assert_eq!(region.as_words()?, &[1, 2, 3, 4]);
//!     assert!(region.as_words_mut().is_err());
//!
//!     region.destroy();
//!     assert_eq!(region.state(), RegionState::Destroyed);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![deny(missing_docs)]

mod coredump;
mod error;
mod heap;
mod state;
mod traits;

#[cfg(unix)]
mod locked;
#[cfg(unix)]
mod page;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use coredump::disable_core_dumps;
pub use error::{MemoryError, PageError};
pub use heap::{HeapAllocator, HeapRegion};
pub use state::RegionState;
pub use traits::{Allocator, Region};

#[cfg(unix)]
pub use locked::{LockedAllocator, LockedRegion};

/// Strongest allocator available on this target.
#[cfg(unix)]
pub type SystemAllocator = LockedAllocator;

/// Strongest allocator available on this target.
#[cfg(not(unix))]
pub type SystemAllocator = HeapAllocator;

/// Region type produced by [`SystemAllocator`].
pub type SystemRegion = <SystemAllocator as Allocator>::Region;
