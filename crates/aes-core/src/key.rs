//! Key sizes and the schedule geometry they imply.

use core::fmt;

/// Supported AES key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 16-byte key, 10 rounds.
    Aes128,
    /// 24-byte key, 12 rounds.
    Aes192,
    /// 32-byte key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// Every supported size, smallest first.
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    /// Maps a raw key length in bytes to its key size.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in bits.
    pub fn bits(self) -> usize {
        self.key_len() * 8
    }

    /// Number of 32-bit words in the key (`Nk`).
    pub fn key_words(self) -> usize {
        self.key_len() / 4
    }

    /// Number of rounds (`Nr = Nk + 6`).
    pub fn rounds(self) -> usize {
        self.key_words() + 6
    }

    /// Words in one expanded schedule: one four-word round key per round plus
    /// the initial whitening key. Equals `key_len + 28`.
    pub fn schedule_words(self) -> usize {
        4 * (self.rounds() + 1)
    }

    /// Bytes needed to hold one expanded schedule.
    pub fn schedule_bytes(self) -> usize {
        4 * self.schedule_words()
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bits())
    }
}
