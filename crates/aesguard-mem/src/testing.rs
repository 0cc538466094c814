//! Allocator double for exercising callers of [`Allocator`].
//!
//! [`TestAllocator`] hands out heap regions and records what happens to
//! them: how many allocations were made, how many regions are still alive,
//! and the wiped storage of every destroyed region. It can also be told to
//! fail a specific allocation or a specific seal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{MemoryError, PageError};
use crate::heap::{HeapAllocator, HeapRegion};
use crate::state::RegionState;
use crate::traits::{Allocator, Region};

#[derive(Debug, Default)]
struct Ledger {
    allocations: AtomicUsize,
    seals: AtomicUsize,
    live: AtomicUsize,
    destroyed: Mutex<Vec<Vec<u32>>>,
}

/// Heap-backed allocator with fault injection and wipe inspection.
#[derive(Debug, Clone, Default)]
pub struct TestAllocator {
    ledger: Arc<Ledger>,
    fail_at: Option<usize>,
    fail_seal_at: Option<usize>,
}

impl TestAllocator {
    /// Allocator that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator whose `nth` allocation (1-based) fails with
    /// [`PageError::Lock`].
    pub fn failing_at(nth: usize) -> Self {
        Self {
            fail_at: Some(nth),
            ..Self::default()
        }
    }

    /// Allocator whose `nth` call to [`Region::seal`] (1-based, counted over
    /// every region it handed out) fails with [`PageError::Protect`].
    ///
    /// Sealing done inside `allocate_immutable` is not counted.
    pub fn failing_seal_at(nth: usize) -> Self {
        Self {
            fail_seal_at: Some(nth),
            ..Self::default()
        }
    }

    /// Number of allocation attempts so far, failed ones included.
    pub fn allocations(&self) -> usize {
        self.ledger.allocations.load(Ordering::SeqCst)
    }

    /// Number of [`Region::seal`] calls so far, failed ones included.
    pub fn seals(&self) -> usize {
        self.ledger.seals.load(Ordering::SeqCst)
    }

    /// Regions handed out and not yet destroyed.
    pub fn live_regions(&self) -> usize {
        self.ledger.live.load(Ordering::SeqCst)
    }

    /// Storage of every destroyed region, as it was left after wiping.
    pub fn destroyed_regions(&self) -> Vec<Vec<u32>> {
        self.ledger
            .destroyed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn admit(&self) -> Result<(), MemoryError> {
        let nth = self.ledger.allocations.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(nth) {
            return Err(MemoryError::Allocation(PageError::Lock));
        }
        Ok(())
    }

    fn track(&self, inner: HeapRegion) -> TestRegion {
        self.ledger.live.fetch_add(1, Ordering::SeqCst);
        TestRegion {
            inner,
            ledger: Arc::clone(&self.ledger),
            fail_seal_at: self.fail_seal_at,
        }
    }
}

impl Allocator for TestAllocator {
    type Region = TestRegion;

    fn allocate_immutable(&self, bytes: &[u8]) -> Result<TestRegion, MemoryError> {
        self.admit()?;
        Ok(self.track(HeapAllocator.allocate_immutable(bytes)?))
    }

    fn allocate_mutable(&self, size: usize) -> Result<TestRegion, MemoryError> {
        self.admit()?;
        Ok(self.track(HeapAllocator.allocate_mutable(size)?))
    }
}

/// Region produced by [`TestAllocator`].
#[derive(Debug)]
pub struct TestRegion {
    inner: HeapRegion,
    ledger: Arc<Ledger>,
    fail_seal_at: Option<usize>,
}

impl Region for TestRegion {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn state(&self) -> RegionState {
        self.inner.state()
    }

    fn as_bytes(&self) -> Result<&[u8], MemoryError> {
        self.inner.as_bytes()
    }

    fn as_words(&self) -> Result<&[u32], MemoryError> {
        self.inner.as_words()
    }

    fn as_words_mut(&mut self) -> Result<&mut [u32], MemoryError> {
        self.inner.as_words_mut()
    }

    fn seal(&mut self) -> Result<(), MemoryError> {
        let nth = self.ledger.seals.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_seal_at == Some(nth) {
            return Err(MemoryError::Allocation(PageError::Protect));
        }
        self.inner.seal()
    }

    fn destroy(&mut self) {
        if let Some(storage) = self.inner.take_wiped() {
            self.ledger.live.fetch_sub(1, Ordering::SeqCst);
            self.ledger
                .destroyed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(storage);
        }
    }
}

impl Drop for TestRegion {
    fn drop(&mut self) {
        self.destroy();
    }
}
