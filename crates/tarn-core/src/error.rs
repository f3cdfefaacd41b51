//! Arena error types.

use std::error::Error;
use std::fmt;

/// Recoverable errors from arena operations.
///
/// Programmer errors (bad alignment, shrinking `expand`, undersized growing
/// arenas) are not represented here; they panic at the call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena cannot satisfy the reservation.
    MemoryExhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left in the arena before the call.
        available: usize,
    },
    /// An offset (or offset range) does not resolve inside the reserved
    /// region of the arena.
    OutOfRange {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range in bytes.
        len: usize,
        /// Bytes currently reserved in the arena.
        used: usize,
    },
    /// A string view was requested over bytes that are not valid UTF-8.
    InvalidUtf8 {
        /// Offset of the string's character data.
        offset: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemoryExhausted {
                requested,
                available,
            } => {
                write!(
                    f,
                    "memory exhausted: requested {requested} bytes, {available} bytes available"
                )
            }
            Self::OutOfRange { offset, len, used } => {
                write!(
                    f,
                    "offset out of range: {len} bytes at offset {offset}, {used} bytes reserved"
                )
            }
            Self::InvalidUtf8 { offset } => {
                write!(f, "string at offset {offset} is not valid UTF-8")
            }
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_memory_exhausted() {
        let err = ArenaError::MemoryExhausted {
            requested: 16,
            available: 8,
        };
        assert_eq!(
            err.to_string(),
            "memory exhausted: requested 16 bytes, 8 bytes available"
        );
    }

    #[test]
    fn display_out_of_range() {
        let err = ArenaError::OutOfRange {
            offset: 64,
            len: 8,
            used: 32,
        };
        assert_eq!(
            err.to_string(),
            "offset out of range: 8 bytes at offset 64, 32 bytes reserved"
        );
    }

    #[test]
    fn errors_are_comparable() {
        let a = ArenaError::InvalidUtf8 { offset: 3 };
        assert_eq!(a.clone(), a);
        assert_ne!(a, ArenaError::InvalidUtf8 { offset: 4 });
    }
}
