//! Region lifecycle states.

use core::fmt;

/// Lifecycle of a protected region. Transitions only move forward:
/// `Writable -> ReadOnly -> Destroyed` (a writable region may also be
/// destroyed directly).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionState {
    /// Contents may be read and written.
    Writable,
    /// Sealed; contents may only be read.
    ReadOnly,
    /// Wiped and released; contents are gone.
    Destroyed,
}

impl RegionState {
    /// Returns true while the contents are still readable.
    pub fn is_readable(self) -> bool {
        matches!(self, Self::Writable | Self::ReadOnly)
    }
}

impl fmt::Display for RegionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Writable => "writable",
            Self::ReadOnly => "read-only",
            Self::Destroyed => "destroyed",
        })
    }
}
