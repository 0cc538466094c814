//! Block representation helpers.

/// Size of an AES block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, column-major as in FIPS-197.
pub type Block = [u8; BLOCK_SIZE];

/// XORs four big-endian schedule words into the state.
#[inline]
pub fn xor_words(state: &mut Block, words: &[u32]) {
    for (column, word) in state.chunks_exact_mut(4).zip(words) {
        for (byte, key_byte) in column.iter_mut().zip(word.to_be_bytes()) {
            *byte ^= key_byte;
        }
    }
}

/// Loads four big-endian words from a block.
#[inline]
pub fn block_to_words(block: &Block) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, column) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([column[0], column[1], column[2], column[3]]);
    }
    words
}

/// Stores four words into a block, big-endian.
#[inline]
pub fn words_to_block(words: &[u32]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    for (column, word) in block.chunks_exact_mut(4).zip(words) {
        column.copy_from_slice(&word.to_be_bytes());
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_and_blocks_share_byte_order() {
        let block: Block = core::array::from_fn(|i| i as u8);
        let words = block_to_words(&block);
        assert_eq!(words[0], 0x0001_0203);
        assert_eq!(words[3], 0x0c0d_0e0f);
        assert_eq!(words_to_block(&words), block);
    }

    #[test]
    fn xor_words_is_an_involution() {
        let original: Block = [0xa5; BLOCK_SIZE];
        let mut state = original;
        let key = [0xdead_beef, 0x0123_4567, 0x89ab_cdef, 0xffff_0000];
        xor_words(&mut state, &key);
        assert_ne!(state, original);
        xor_words(&mut state, &key);
        assert_eq!(state, original);
    }
}
