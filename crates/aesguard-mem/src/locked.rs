//! LockedRegion - Unix protected memory region.
//!
//! Uses mmap for allocation, mlock to keep the pages out of swap,
//! madvise(MADV_DONTDUMP) to keep them out of core dumps, and
//! mprotect(PROT_READ) to seal them once populated.
//!
//! On destroy the pages are made writable again, zeroized, unlocked and
//! unmapped. If unprotecting a sealed region fails the pages are still
//! unmapped; the kernel never hands out a previous owner's page contents.

use core::fmt;

use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::coredump::disable_core_dumps;
use crate::error::{MemoryError, PageError};
use crate::page::Pages;
use crate::state::RegionState;
use crate::traits::{Allocator, Region};

/// A region backed by locked anonymous pages.
pub struct LockedRegion {
    pages: Option<Pages>,
    len: usize,
    state: RegionState,
}

// Safety: the region owns its mapping; shared access only reads, mutation
// requires `&mut self`.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    fn writable(len: usize) -> Result<Self, PageError> {
        let pages = Pages::map(len)?;
        pages.lock()?;

        if !pages.exclude_from_dumps() {
            debug!("madvise(MADV_DONTDUMP) unavailable, relying on process-wide suppression");
        }

        Ok(Self {
            pages: Some(pages),
            len,
            state: RegionState::Writable,
        })
    }

    fn mapped(&self, operation: &'static str) -> Result<&Pages, MemoryError> {
        self.pages
            .as_ref()
            .ok_or(MemoryError::state(operation, RegionState::Destroyed))
    }

    fn copy_from(&mut self, bytes: &[u8]) -> Result<(), MemoryError> {
        let state = self.state;
        match self.pages.as_mut() {
            Some(pages) if state == RegionState::Writable => {
                let storage = unsafe { pages.as_mut_slice() };
                storage[..bytes.len()].copy_from_slice(bytes);
                Ok(())
            }
            _ => Err(MemoryError::state("write", state)),
        }
    }

    /// Zeroizes every mapped byte, unprotecting a sealed mapping first.
    /// Returns false if the pages could not be made writable.
    fn wipe(&mut self) -> bool {
        let sealed = self.state == RegionState::ReadOnly;
        let Some(pages) = self.pages.as_mut() else {
            return false;
        };

        if sealed {
            if let Err(err) = pages.unprotect() {
                warn!(error = %err, "cannot unprotect sealed region for wiping");
                return false;
            }
        }

        let storage = unsafe { pages.as_mut_slice() };
        storage.zeroize();
        true
    }
}

impl Region for LockedRegion {
    fn len(&self) -> usize {
        self.len
    }

    fn state(&self) -> RegionState {
        self.state
    }

    fn as_bytes(&self) -> Result<&[u8], MemoryError> {
        let pages = self.mapped("read")?;
        Ok(unsafe { core::slice::from_raw_parts(pages.as_ptr(), self.len) })
    }

    fn as_words(&self) -> Result<&[u32], MemoryError> {
        let pages = self.mapped("read")?;
        // Mappings are page aligned.
        Ok(unsafe { core::slice::from_raw_parts(pages.as_ptr().cast::<u32>(), self.len / 4) })
    }

    fn as_words_mut(&mut self) -> Result<&mut [u32], MemoryError> {
        let state = self.state;
        match self.pages.as_mut() {
            Some(pages) if state == RegionState::Writable => Ok(unsafe {
                core::slice::from_raw_parts_mut(pages.as_ptr().cast::<u32>(), self.len / 4)
            }),
            _ => Err(MemoryError::state("write", state)),
        }
    }

    fn seal(&mut self) -> Result<(), MemoryError> {
        if self.state != RegionState::Writable {
            return Err(MemoryError::state("seal", self.state));
        }

        self.mapped("seal")?.protect()?;
        self.state = RegionState::ReadOnly;
        Ok(())
    }

    fn destroy(&mut self) {
        if self.pages.is_none() {
            return;
        }

        self.wipe();
        // Dropping the pages unlocks and unmaps them.
        self.pages = None;
        self.state = RegionState::Destroyed;
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for LockedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedRegion")
            .field("len", &self.len)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Allocator handing out [`LockedRegion`]s.
///
/// The first allocation also disables core dumps for the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct LockedAllocator;

impl Allocator for LockedAllocator {
    type Region = LockedRegion;

    fn allocate_immutable(&self, bytes: &[u8]) -> Result<LockedRegion, MemoryError> {
        let mut region = self.allocate_mutable(bytes.len())?;
        region.copy_from(bytes)?;
        region.seal()?;
        Ok(region)
    }

    fn allocate_mutable(&self, size: usize) -> Result<LockedRegion, MemoryError> {
        disable_core_dumps();
        let region = LockedRegion::writable(size)?;
        debug!(size, "allocated locked region");
        Ok(region)
    }
}
