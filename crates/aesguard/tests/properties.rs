//! Property-based tests for guarded cipher construction and use.
//!
//! Covers the round-trip law for every key size, rejection of bad key
//! lengths without leaking regions, and the destroyed-handle contract.

use aesguard::{new_cipher, CipherError, GuardedAes, BLOCK_SIZE};
use aesguard_mem::testing::TestAllocator;
use proptest::prelude::*;

/// Generate keys of every supported length.
fn valid_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![Just(16usize), Just(24usize), Just(32usize)]
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

/// Generate keys of any other length.
fn invalid_key() -> impl Strategy<Value = Vec<u8>> {
    (0usize..64)
        .prop_filter("supported key length", |len| ![16, 24, 32].contains(len))
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn encrypt_then_decrypt_recovers_block(key in valid_key(), block in any::<[u8; BLOCK_SIZE]>()) {
        let mut cipher = new_cipher(&key).unwrap();
        let mut ct = [0u8; BLOCK_SIZE];
        let mut pt = [0u8; BLOCK_SIZE];

        cipher.encrypt(&mut ct, &block).unwrap();
        cipher.decrypt(&mut pt, &ct).unwrap();
        prop_assert_eq!(pt, block);

        cipher.destroy();
    }

    #[test]
    fn locked_and_test_regions_agree(key in valid_key(), block in any::<[u8; BLOCK_SIZE]>()) {
        let locked = new_cipher(&key).unwrap();
        let alloc = TestAllocator::new();
        let heap = GuardedAes::with_allocator(&alloc, &key).unwrap();

        let mut a = [0u8; BLOCK_SIZE];
        let mut b = [0u8; BLOCK_SIZE];
        locked.encrypt(&mut a, &block).unwrap();
        heap.encrypt(&mut b, &block).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn bad_key_lengths_are_rejected_without_allocating(key in invalid_key()) {
        let alloc = TestAllocator::new();
        let err = GuardedAes::with_allocator(&alloc, &key).unwrap_err();

        prop_assert_eq!(err, CipherError::InvalidKeySize(key.len()));
        prop_assert_eq!(alloc.allocations(), 0);
        prop_assert_eq!(alloc.live_regions(), 0);
    }

    #[test]
    fn destroyed_handles_refuse_work(key in valid_key(), block in any::<[u8; BLOCK_SIZE]>()) {
        let alloc = TestAllocator::new();
        let mut cipher = GuardedAes::with_allocator(&alloc, &key).unwrap();
        cipher.destroy();
        cipher.destroy();

        let mut out = [0u8; BLOCK_SIZE];
        prop_assert_eq!(cipher.encrypt(&mut out, &block), Err(CipherError::UseAfterDestroy));
        prop_assert_eq!(cipher.decrypt(&mut out, &block), Err(CipherError::UseAfterDestroy));
        prop_assert_eq!(out, [0u8; BLOCK_SIZE]);
        prop_assert_eq!(alloc.live_regions(), 0);
        prop_assert!(alloc.destroyed_regions().iter().flatten().all(|w| *w == 0));
    }

    #[test]
    fn any_failed_allocation_is_atomic(key in valid_key(), nth in 1usize..=3) {
        let alloc = TestAllocator::failing_at(nth);
        let err = GuardedAes::with_allocator(&alloc, &key).unwrap_err();

        prop_assert!(matches!(err, CipherError::Allocation(_)));
        prop_assert_eq!(alloc.live_regions(), 0);
    }
}
