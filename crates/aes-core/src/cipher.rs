//! AES key schedule and block encryption/decryption over 32-bit word schedules.

use crate::block::{block_to_words, words_to_block, xor_words, Block};
use crate::error::AesError;
use crate::key::KeySize;
use crate::round::{
    inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows, sub_bytes,
};
use crate::sbox::sbox;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

fn rounds_for(schedule: &[u32]) -> Result<usize, AesError> {
    KeySize::ALL
        .into_iter()
        .find(|size| size.schedule_words() == schedule.len())
        .map(KeySize::rounds)
        .ok_or(AesError::UnsupportedSchedule(schedule.len()))
}

fn round_key(schedule: &[u32], round: usize) -> &[u32] {
    &schedule[4 * round..4 * round + 4]
}

/// Expands `key` into an encryption schedule and an equivalent-inverse-cipher
/// decryption schedule.
///
/// Both output buffers must hold exactly [`KeySize::schedule_words`] words for
/// the key's size. `dec` holds the round keys in reverse order with
/// InvMixColumns folded into every round key except the first and last, so
/// [`decrypt_block`] can run the rounds in the same shape as encryption.
pub fn expand_key(key: &[u8], enc: &mut [u32], dec: &mut [u32]) -> Result<KeySize, AesError> {
    let size = KeySize::from_len(key.len()).ok_or(AesError::InvalidKeySize(key.len()))?;
    let expected = size.schedule_words();
    for got in [enc.len(), dec.len()] {
        if got != expected {
            return Err(AesError::ScheduleLength { expected, got });
        }
    }

    let nk = size.key_words();
    for (word, chunk) in enc.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in nk..expected {
        let mut temp = enc[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        enc[i] = enc[i - nk] ^ temp;
    }

    let rounds = size.rounds();
    for round in 0..=rounds {
        let src = round_key(enc, rounds - round);
        let dst = &mut dec[4 * round..4 * round + 4];
        if round == 0 || round == rounds {
            dst.copy_from_slice(src);
        } else {
            let mut block = words_to_block(src);
            inv_mix_columns(&mut block);
            dst.copy_from_slice(&block_to_words(&block));
        }
    }

    Ok(size)
}

/// Encrypts a single 16-byte block with an encryption schedule.
pub fn encrypt_block(enc: &[u32], dst: &mut Block, src: &Block) -> Result<(), AesError> {
    let rounds = rounds_for(enc)?;
    let mut state = *src;

    xor_words(&mut state, round_key(enc, 0));
    for round in 1..rounds {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        xor_words(&mut state, round_key(enc, round));
    }
    sub_bytes(&mut state);
    shift_rows(&mut state);
    xor_words(&mut state, round_key(enc, rounds));

    *dst = state;
    Ok(())
}

/// Decrypts a single 16-byte block with a decryption schedule from [`expand_key`].
pub fn decrypt_block(dec: &[u32], dst: &mut Block, src: &Block) -> Result<(), AesError> {
    let rounds = rounds_for(dec)?;
    let mut state = *src;

    xor_words(&mut state, round_key(dec, 0));
    for round in 1..rounds {
        inv_sub_bytes(&mut state);
        inv_shift_rows(&mut state);
        inv_mix_columns(&mut state);
        xor_words(&mut state, round_key(dec, round));
    }
    inv_sub_bytes(&mut state);
    inv_shift_rows(&mut state);
    xor_words(&mut state, round_key(dec, rounds));

    *dst = state;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    const FIPS_PLAIN: Block = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    // FIPS-197 appendix C, key = 00 01 02 .. (len - 1)
    const FIPS_CIPHER: [(usize, Block); 3] = [
        (
            16,
            [
                0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
                0xc5, 0x5a,
            ],
        ),
        (
            24,
            [
                0xdd, 0xa9, 0x7c, 0xa4, 0x86, 0x4c, 0xdf, 0xe0, 0x6e, 0xaf, 0x70, 0xa0, 0xec, 0x0d,
                0x71, 0x91,
            ],
        ),
        (
            32,
            [
                0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49,
                0x60, 0x89,
            ],
        ),
    ];

    fn schedules(key: &[u8]) -> (Vec<u32>, Vec<u32>) {
        let words = key.len() + 28;
        let mut enc = vec![0u32; words];
        let mut dec = vec![0u32; words];
        expand_key(key, &mut enc, &mut dec).expect("valid key");
        (enc, dec)
    }

    #[test]
    fn encrypt_matches_fips_vectors() {
        for (len, expected) in FIPS_CIPHER {
            let key: Vec<u8> = (0..len as u8).collect();
            let (enc, dec) = schedules(&key);

            let mut ct = [0u8; 16];
            encrypt_block(&enc, &mut ct, &FIPS_PLAIN).unwrap();
            assert_eq!(ct, expected, "{len}-byte key");

            let mut pt = [0u8; 16];
            decrypt_block(&dec, &mut pt, &ct).unwrap();
            assert_eq!(pt, FIPS_PLAIN, "{len}-byte key");
        }
    }

    #[test]
    fn last_expanded_word_matches_fips_appendix_a() {
        let key = [
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ];
        let (enc, dec) = schedules(&key);
        assert_eq!(enc[4], 0xa0fa_fe17);
        assert_eq!(enc[43], 0xb663_0ca6);
        assert_eq!(&dec[..4], &enc[40..]);
        assert_eq!(&dec[40..], &enc[..4]);
    }

    #[test]
    fn expand_rejects_bad_key_sizes() {
        let mut enc = [0u32; 44];
        let mut dec = [0u32; 44];
        for len in [0usize, 15, 17, 33] {
            let key = vec![0u8; len];
            assert_eq!(
                expand_key(&key, &mut enc, &mut dec),
                Err(AesError::InvalidKeySize(len))
            );
        }
    }

    #[test]
    fn expand_rejects_mismatched_buffers() {
        let key = [0u8; 24];
        let mut enc = [0u32; 44];
        let mut dec = [0u32; 52];
        assert_eq!(
            expand_key(&key, &mut enc, &mut dec),
            Err(AesError::ScheduleLength {
                expected: 52,
                got: 44
            })
        );
    }

    #[test]
    fn block_functions_reject_odd_schedules() {
        let schedule = [0u32; 40];
        let mut out = [0u8; 16];
        assert_eq!(
            encrypt_block(&schedule, &mut out, &[0u8; 16]),
            Err(AesError::UnsupportedSchedule(40))
        );
        assert_eq!(
            decrypt_block(&schedule, &mut out, &[0u8; 16]),
            Err(AesError::UnsupportedSchedule(40))
        );
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for size in KeySize::ALL {
            for _ in 0..50 {
                let mut key = vec![0u8; size.key_len()];
                let mut block = [0u8; 16];
                rng.fill_bytes(&mut key);
                rng.fill_bytes(&mut block);
                let (enc, dec) = schedules(&key);

                let mut ct = [0u8; 16];
                let mut pt = [0u8; 16];
                encrypt_block(&enc, &mut ct, &block).unwrap();
                decrypt_block(&dec, &mut pt, &ct).unwrap();
                assert_eq!(pt, block);
            }
        }
    }
}
