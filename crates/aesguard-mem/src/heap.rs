//! HeapRegion - portable region on the ordinary heap.
//!
//! Keeps the same lifecycle and zero-on-destroy guarantee as
//! [`LockedRegion`](crate::LockedRegion) but cannot lock or page-protect
//! anything. Used on targets without mmap.

use core::{fmt, mem};

use zeroize::Zeroize;

use crate::coredump::disable_core_dumps;
use crate::error::MemoryError;
use crate::state::RegionState;
use crate::traits::{Allocator, Region};

/// A heap-backed region, word aligned.
pub struct HeapRegion {
    words: Vec<u32>,
    len: usize,
    state: RegionState,
}

impl HeapRegion {
    fn writable(len: usize) -> Self {
        Self {
            words: vec![0u32; len.div_ceil(4)],
            len,
            state: RegionState::Writable,
        }
    }

    /// Zeroizes the storage and hands it back instead of freeing it.
    pub(crate) fn take_wiped(&mut self) -> Option<Vec<u32>> {
        if self.state == RegionState::Destroyed {
            return None;
        }

        self.words.as_mut_slice().zeroize();
        self.state = RegionState::Destroyed;
        Some(mem::take(&mut self.words))
    }

    fn readable(&self) -> Result<(), MemoryError> {
        if !self.state.is_readable() {
            return Err(MemoryError::state("read", self.state));
        }
        Ok(())
    }
}

impl Region for HeapRegion {
    fn len(&self) -> usize {
        self.len
    }

    fn state(&self) -> RegionState {
        self.state
    }

    fn as_bytes(&self) -> Result<&[u8], MemoryError> {
        self.readable()?;
        // `words` holds at least `len` bytes and u8 has no alignment needs.
        Ok(unsafe { core::slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), self.len) })
    }

    fn as_words(&self) -> Result<&[u32], MemoryError> {
        self.readable()?;
        Ok(&self.words[..self.len / 4])
    }

    fn as_words_mut(&mut self) -> Result<&mut [u32], MemoryError> {
        if self.state != RegionState::Writable {
            return Err(MemoryError::state("write", self.state));
        }
        Ok(&mut self.words[..self.len / 4])
    }

    fn seal(&mut self) -> Result<(), MemoryError> {
        if self.state != RegionState::Writable {
            return Err(MemoryError::state("seal", self.state));
        }
        self.state = RegionState::ReadOnly;
        Ok(())
    }

    fn destroy(&mut self) {
        drop(self.take_wiped());
    }
}

impl Drop for HeapRegion {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for HeapRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapRegion")
            .field("len", &self.len)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Allocator handing out [`HeapRegion`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {
    type Region = HeapRegion;

    fn allocate_immutable(&self, bytes: &[u8]) -> Result<HeapRegion, MemoryError> {
        let mut region = self.allocate_mutable(bytes.len())?;
        let len = region.len;
        let storage = unsafe {
            core::slice::from_raw_parts_mut(region.words.as_mut_ptr().cast::<u8>(), len)
        };
        storage.copy_from_slice(bytes);
        region.seal()?;
        Ok(region)
    }

    fn allocate_mutable(&self, size: usize) -> Result<HeapRegion, MemoryError> {
        disable_core_dumps();
        Ok(HeapRegion::writable(size))
    }
}
