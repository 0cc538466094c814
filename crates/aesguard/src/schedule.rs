//! Key schedule setup: raw key bytes to sealed encryption and decryption
//! schedules.
//!
//! Order of operations:
//! 1. validate the key length (nothing is allocated for a bad key),
//! 2. allocate both schedule regions writable, then copy the key into a
//!    sealed region of its own,
//! 3. expand the key into the two schedules,
//! 4. destroy the key region, whatever the expansion returned,
//! 5. seal both schedules.
//!
//! Regions destroy themselves when dropped, so every early return releases
//! whatever was allocated before it and no partially built schedule escapes.

use aes_core::{expand_key, KeySize};
use aesguard_mem::{Allocator, Region};
use tracing::debug;

use crate::error::CipherError;

/// Sealed encryption and decryption schedules for one key.
#[derive(Debug)]
pub struct Schedules<R: Region> {
    /// Encryption-order round keys, read-only.
    pub enc: R,
    /// Decryption-order round keys, read-only.
    pub dec: R,
    /// Size of the key they were expanded from.
    pub key_size: KeySize,
}

/// Builds sealed schedules for `key` using regions from `alloc`.
pub fn build_schedules<A: Allocator>(
    alloc: &A,
    key: &[u8],
) -> Result<Schedules<A::Region>, CipherError> {
    let key_size = KeySize::from_len(key.len()).ok_or(CipherError::InvalidKeySize(key.len()))?;
    let schedule_bytes = key_size.schedule_bytes();

    let mut enc = alloc.allocate_mutable(schedule_bytes)?;
    let mut dec = alloc.allocate_mutable(schedule_bytes)?;
    let mut key_region = alloc.allocate_immutable(key)?;

    let expanded = expand_into(&key_region, &mut enc, &mut dec);
    key_region.destroy();
    expanded?;

    enc.seal()?;
    dec.seal()?;

    debug!(%key_size, words = key_size.schedule_words(), "sealed key schedules");

    Ok(Schedules { enc, dec, key_size })
}

fn expand_into<R: Region>(key: &R, enc: &mut R, dec: &mut R) -> Result<(), CipherError> {
    expand_key(key.as_bytes()?, enc.as_words_mut()?, dec.as_words_mut()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aesguard_mem::testing::TestAllocator;
    use aesguard_mem::{MemoryError, PageError, RegionState};

    fn plain_schedules(key: &[u8]) -> (Vec<u32>, Vec<u32>) {
        let mut enc = vec![0u32; key.len() + 28];
        let mut dec = vec![0u32; key.len() + 28];
        expand_key(key, &mut enc, &mut dec).unwrap();
        (enc, dec)
    }

    #[test]
    fn schedules_are_sealed_and_match_reference_expansion() {
        for size in KeySize::ALL {
            let key: Vec<u8> = (0..size.key_len() as u8).map(|b| b.wrapping_mul(7)).collect();
            let alloc = TestAllocator::new();
            let schedules = build_schedules(&alloc, &key).unwrap();

            assert_eq!(schedules.key_size, size);
            assert_eq!(schedules.enc.state(), RegionState::ReadOnly);
            assert_eq!(schedules.dec.state(), RegionState::ReadOnly);
            assert_eq!(schedules.enc.len(), size.schedule_bytes());

            let (enc, dec) = plain_schedules(&key);
            assert_eq!(schedules.enc.as_words().unwrap(), enc.as_slice());
            assert_eq!(schedules.dec.as_words().unwrap(), dec.as_slice());
        }
    }

    #[test]
    fn key_region_is_wiped_before_returning() {
        let alloc = TestAllocator::new();
        let _schedules = build_schedules(&alloc, &[0xffu8; 32]).unwrap();

        assert_eq!(alloc.allocations(), 3);
        assert_eq!(alloc.live_regions(), 2);
        let destroyed = alloc.destroyed_regions();
        assert_eq!(destroyed.len(), 1);
        assert_eq!(destroyed[0], vec![0u32; 8]);
    }

    #[test]
    fn bad_key_size_allocates_nothing() {
        for len in [0usize, 1, 15, 17, 23, 25, 31, 33, 48] {
            let alloc = TestAllocator::new();
            let err = build_schedules(&alloc, &vec![0u8; len]).unwrap_err();
            assert_eq!(err, CipherError::InvalidKeySize(len));
            assert_eq!(alloc.allocations(), 0);
        }
    }

    #[test]
    fn failed_allocation_leaves_no_region_behind() {
        for nth in 1..=3 {
            let alloc = TestAllocator::failing_at(nth);
            let err = build_schedules(&alloc, &[1u8; 16]).unwrap_err();

            assert_eq!(
                err,
                CipherError::Allocation(MemoryError::Allocation(PageError::Lock))
            );
            assert_eq!(alloc.allocations(), nth);
            assert_eq!(alloc.live_regions(), 0, "allocation {nth} failed");
            assert!(alloc
                .destroyed_regions()
                .iter()
                .all(|storage| storage.iter().all(|w| *w == 0)));
        }
    }

    #[test]
    fn failed_seal_leaves_no_region_behind() {
        for nth in 1..=2 {
            let alloc = TestAllocator::failing_seal_at(nth);
            let err = build_schedules(&alloc, &[7u8; 16]).unwrap_err();

            assert_eq!(
                err,
                CipherError::Allocation(MemoryError::Allocation(PageError::Protect))
            );
            assert_eq!(alloc.seals(), nth);
            assert_eq!(alloc.live_regions(), 0, "seal {nth} failed");

            // key region is wiped first, then the two schedules on unwind
            let destroyed = alloc.destroyed_regions();
            assert_eq!(destroyed.len(), 3);
            assert_eq!(destroyed[0], vec![0u32; 4]);
            assert!(destroyed.iter().flatten().all(|w| *w == 0));
        }
    }
}
