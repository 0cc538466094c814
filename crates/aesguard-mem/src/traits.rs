use crate::error::MemoryError;
use crate::state::RegionState;

/// A protected memory region with a one-way lifecycle.
pub trait Region: Send + Sync + core::fmt::Debug {
    /// Length of the region in bytes.
    fn len(&self) -> usize;

    /// Returns true if the region has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current lifecycle state.
    fn state(&self) -> RegionState;

    /// Byte view. Fails once the region is destroyed.
    fn as_bytes(&self) -> Result<&[u8], MemoryError>;

    /// Word view over `len / 4` words. Fails once the region is destroyed.
    fn as_words(&self) -> Result<&[u32], MemoryError>;

    /// Mutable word view. Only valid while the region is writable.
    fn as_words_mut(&mut self) -> Result<&mut [u32], MemoryError>;

    /// Transitions `Writable -> ReadOnly`.
    fn seal(&mut self) -> Result<(), MemoryError>;

    /// Overwrites the region with zeros and releases it. Calling this on an
    /// already destroyed region does nothing.
    fn destroy(&mut self);
}

/// Capability that hands out protected regions.
pub trait Allocator {
    /// Region type produced by this allocator.
    type Region: Region;

    /// Allocates a region holding a copy of `bytes`, already sealed read-only.
    fn allocate_immutable(&self, bytes: &[u8]) -> Result<Self::Region, MemoryError>;

    /// Allocates a zero-initialised writable region of `size` bytes.
    fn allocate_mutable(&self, size: usize) -> Result<Self::Region, MemoryError>;
}
