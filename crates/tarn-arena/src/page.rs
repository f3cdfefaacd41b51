//! Fixed-capacity, single-page bump allocator.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::ptr::NonNull;

use tarn_core::{Allocator, ArenaError};
use tracing::trace;

use crate::bump::{check_offset, check_range, Reservation, WORD_BYTES};

/// Capacity of a [`PageAllocator`] in bytes.
pub const PAGE_SIZE: usize = 4096;

const PAGE_WORDS: usize = PAGE_SIZE / WORD_BYTES;

/// A bump allocator over exactly one inline page.
///
/// The page lives inside the struct, so the whole arena is a single
/// allocation wherever the caller places it (see [`boxed`](Self::boxed)).
/// The buffer never moves: addresses returned by
/// [`offset`](Allocator::offset) stay valid until [`reset`](Self::reset).
/// When a reservation does not fit, `alloc` returns
/// [`ArenaError::MemoryExhausted`] and the cursor is left untouched.
pub struct PageAllocator {
    page: RefCell<[u64; PAGE_WORDS]>,
    cursor: Cell<usize>,
}

impl PageAllocator {
    /// Create an empty page allocator.
    pub fn new() -> Self {
        Self {
            page: RefCell::new([0; PAGE_WORDS]),
            cursor: Cell::new(0),
        }
    }

    /// Create an empty page allocator on the heap.
    pub fn boxed() -> Box<Self> {
        Box::new(Self::new())
    }

    /// Total capacity in bytes. Always [`PAGE_SIZE`].
    pub fn capacity(&self) -> usize {
        PAGE_SIZE
    }

    /// Discard every reservation.
    ///
    /// The bytes are not cleared; later reservations reuse them with
    /// unspecified contents.
    pub fn reset(&mut self) {
        trace!(released = self.cursor.get(), "page arena reset");
        *self.cursor.get_mut() = 0;
    }
}

impl Default for PageAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PageAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageAllocator")
            .field("used", &self.cursor.get())
            .field("capacity", &PAGE_SIZE)
            .finish()
    }
}

impl Allocator for PageAllocator {
    fn alloc(&self, size: usize, alignment: usize) -> Result<usize, ArenaError> {
        let cursor = self.cursor.get();
        let reservation = Reservation::plan(cursor, size, alignment)
            .filter(|r| r.end <= PAGE_SIZE)
            .ok_or(ArenaError::MemoryExhausted {
                requested: size,
                available: PAGE_SIZE - cursor,
            })?;
        self.cursor.set(reservation.end);
        Ok(reservation.start)
    }

    fn offset(&self, offset: usize) -> Result<NonNull<u8>, ArenaError> {
        let used = self.cursor.get();
        check_offset(offset, used)?;
        let base = self.page.as_ptr().cast::<u8>();
        NonNull::new(base.wrapping_add(offset)).ok_or(ArenaError::OutOfRange {
            offset,
            len: 0,
            used,
        })
    }

    fn available(&self) -> usize {
        PAGE_SIZE - self.cursor.get()
    }

    fn used(&self) -> usize {
        self.cursor.get()
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<Ref<'_, [u8]>, ArenaError> {
        let range = check_range(offset, len, self.cursor.get())?;
        Ok(Ref::map(self.page.borrow(), move |words| {
            &bytemuck::cast_slice::<u64, u8>(&words[..])[range]
        }))
    }

    fn bytes_mut(&self, offset: usize, len: usize) -> Result<RefMut<'_, [u8]>, ArenaError> {
        let range = check_range(offset, len, self.cursor.get())?;
        Ok(RefMut::map(self.page.borrow_mut(), move |words| {
            &mut bytemuck::cast_slice_mut::<u64, u8>(&mut words[..])[range]
        }))
    }
}
