//! Cursor arithmetic shared by the page and growing allocators.

use std::ops::Range;

use tarn_core::{align_up, ArenaError, MAX_ALIGN};

/// Size of one backing word in bytes.
pub(crate) const WORD_BYTES: usize = std::mem::size_of::<u64>();

/// An aligned byte range planned from the current cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Reservation {
    /// Aligned start offset.
    pub(crate) start: usize,
    /// Exclusive end offset; the cursor after committing.
    pub(crate) end: usize,
}

impl Reservation {
    /// Plan a reservation of `size` bytes at `alignment` after `cursor`.
    ///
    /// Returns `None` if the end offset would overflow.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two or exceeds `MAX_ALIGN`.
    pub(crate) fn plan(cursor: usize, size: usize, alignment: usize) -> Option<Self> {
        assert!(
            alignment <= MAX_ALIGN,
            "alignment {alignment} exceeds the arena maximum of {MAX_ALIGN}"
        );
        let start = align_up(cursor, alignment)?;
        let end = start.checked_add(size)?;
        Some(Self { start, end })
    }
}

/// Number of words needed to hold `bytes` bytes.
pub(crate) fn words_for(bytes: usize) -> usize {
    bytes.div_ceil(WORD_BYTES)
}

/// Validate that `[offset, offset + len)` lies inside the reserved region.
pub(crate) fn check_range(offset: usize, len: usize, used: usize) -> Result<Range<usize>, ArenaError> {
    match offset.checked_add(len) {
        Some(end) if end <= used => Ok(offset..end),
        _ => Err(ArenaError::OutOfRange { offset, len, used }),
    }
}

/// Validate that `offset` addresses a reserved byte.
pub(crate) fn check_offset(offset: usize, used: usize) -> Result<(), ArenaError> {
    if offset < used {
        Ok(())
    } else {
        Err(ArenaError::OutOfRange {
            offset,
            len: 0,
            used,
        })
    }
}
