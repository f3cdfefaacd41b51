//! Growing bump allocator with copy-and-relocate expansion.
//!
//! [`GrowingAllocator`] never runs out on size alone. When a reservation
//! would overflow the buffer it allocates a fresh buffer of twice the
//! required end (plus one alignment unit), copies everything written so
//! far, and swaps it in. Offsets survive the move; raw addresses do not.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::ptr::NonNull;

use tarn_core::{Allocator, ArenaError, MAX_ALIGN};
use tracing::{debug, trace};

use crate::bump::{check_offset, check_range, words_for, Reservation, WORD_BYTES};
use crate::config::ArenaConfig;

/// A bump allocator whose buffer doubles when full.
///
/// Every relocation invalidates addresses obtained through
/// [`offset`](Allocator::offset) or held views. Views borrow the buffer, so
/// a reservation that needs to relocate while a view is alive panics
/// instead of leaving the view dangling.
pub struct GrowingAllocator {
    buf: RefCell<Vec<u64>>,
    /// Capacity in bytes, mirrored outside the `RefCell` so it can be read
    /// while a mutable view is alive.
    capacity: Cell<usize>,
    cursor: Cell<usize>,
    relocations: Cell<usize>,
}

impl GrowingAllocator {
    /// Create a growing arena with `initial_capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `initial_capacity` is below
    /// [`ArenaConfig::MIN_CAPACITY`].
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(ArenaConfig::new(initial_capacity))
    }

    /// Create a growing arena from a validated config.
    ///
    /// # Panics
    ///
    /// Panics if the config fails [`ArenaConfig::validate`].
    pub fn with_config(config: ArenaConfig) -> Self {
        config.validate();
        let words = config.initial_words();
        Self {
            buf: RefCell::new(vec![0; words]),
            capacity: Cell::new(words * WORD_BYTES),
            cursor: Cell::new(0),
            relocations: Cell::new(0),
        }
    }

    /// Current buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// How many times the buffer has been relocated.
    pub fn relocations(&self) -> usize {
        self.relocations.get()
    }

    /// Discard every reservation, keeping the current capacity.
    pub fn reset(&mut self) {
        trace!(released = self.cursor.get(), "growing arena reset");
        *self.cursor.get_mut() = 0;
    }

    /// Move the contents into a new buffer large enough for `end` bytes.
    ///
    /// Returns [`ArenaError::MemoryExhausted`] when the host cannot provide
    /// the new buffer; the old one is kept.
    fn relocate(&self, end: usize) -> Result<(), ArenaError> {
        let new_capacity = end
            .checked_mul(2)
            .and_then(|c| c.checked_add(MAX_ALIGN))
            .ok_or(ArenaError::MemoryExhausted {
                requested: end,
                available: self.available(),
            })?;
        let words = words_for(new_capacity);
        let copied = words_for(self.cursor.get());

        let mut grown: Vec<u64> = Vec::new();
        grown
            .try_reserve_exact(words)
            .map_err(|_| ArenaError::MemoryExhausted {
                requested: end,
                available: self.available(),
            })?;
        let mut buf = self.buf.borrow_mut();
        grown.extend_from_slice(&buf[..copied]);
        grown.resize(words, 0);
        *buf = grown;

        let old_capacity = self.capacity.replace(words * WORD_BYTES);
        self.relocations.set(self.relocations.get() + 1);
        debug!(
            old_capacity,
            new_capacity = words * WORD_BYTES,
            copied = self.cursor.get(),
            "relocated growing arena buffer"
        );
        Ok(())
    }
}

impl Default for GrowingAllocator {
    fn default() -> Self {
        Self::with_config(ArenaConfig::default())
    }
}

impl fmt::Debug for GrowingAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowingAllocator")
            .field("used", &self.cursor.get())
            .field("capacity", &self.capacity.get())
            .field("relocations", &self.relocations.get())
            .finish()
    }
}

impl Allocator for GrowingAllocator {
    fn alloc(&self, size: usize, alignment: usize) -> Result<usize, ArenaError> {
        let reservation = Reservation::plan(self.cursor.get(), size, alignment).ok_or(
            ArenaError::MemoryExhausted {
                requested: size,
                available: self.available(),
            },
        )?;
        if reservation.end > self.capacity.get() {
            self.relocate(reservation.end)?;
        }
        self.cursor.set(reservation.end);
        Ok(reservation.start)
    }

    /// # Panics
    ///
    /// Panics if a mutable view of the buffer is alive.
    fn offset(&self, offset: usize) -> Result<NonNull<u8>, ArenaError> {
        let used = self.cursor.get();
        check_offset(offset, used)?;
        let base = self.buf.borrow().as_ptr().cast::<u8>();
        NonNull::new(base.cast_mut().wrapping_add(offset)).ok_or(ArenaError::OutOfRange {
            offset,
            len: 0,
            used,
        })
    }

    /// Always `usize::MAX`: growth is bounded only by host memory.
    fn available(&self) -> usize {
        usize::MAX
    }

    fn used(&self) -> usize {
        self.cursor.get()
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<Ref<'_, [u8]>, ArenaError> {
        let range = check_range(offset, len, self.cursor.get())?;
        Ok(Ref::map(self.buf.borrow(), move |words| {
            &bytemuck::cast_slice::<u64, u8>(words)[range]
        }))
    }

    fn bytes_mut(&self, offset: usize, len: usize) -> Result<RefMut<'_, [u8]>, ArenaError> {
        let range = check_range(offset, len, self.cursor.get())?;
        Ok(RefMut::map(self.buf.borrow_mut(), move |words| {
            &mut bytemuck::cast_slice_mut::<u64, u8>(words)[range]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_requested_capacity() {
        let arena = GrowingAllocator::new(64);
        assert_eq!(arena.capacity(), 64);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.relocations(), 0);
    }

    #[test]
    fn default_starts_at_one_page() {
        assert_eq!(GrowingAllocator::default().capacity(), 4096);
    }

    #[test]
    #[should_panic(expected = "at least 8 bytes")]
    fn undersized_initial_capacity_panics() {
        let _ = GrowingAllocator::new(4);
    }

    #[test]
    fn fits_without_relocating() {
        let arena = GrowingAllocator::new(8);
        assert_eq!(arena.alloc(8, 8).unwrap(), 0);
        assert_eq!(arena.relocations(), 0);
    }

    #[test]
    fn overflow_doubles_plus_slack() {
        let arena = GrowingAllocator::new(8);
        arena.alloc(8, 8).unwrap();
        assert_eq!(arena.alloc(8, 8).unwrap(), 8);
        // end = 16 -> 16 * 2 + 8
        assert_eq!(arena.capacity(), 40);
        assert_eq!(arena.relocations(), 1);
    }

    #[test]
    fn relocation_moves_buffer_and_keeps_contents() {
        let arena = GrowingAllocator::new(8);
        let off = arena.alloc(8, 8).unwrap();
        arena
            .bytes_mut(off, 8)
            .unwrap()
            .copy_from_slice(&100u64.to_ne_bytes());
        let before = arena.offset(off).unwrap();

        arena.alloc(8, 8).unwrap();

        let after = arena.offset(off).unwrap();
        assert_ne!(before, after);
        assert_eq!(&*arena.bytes(off, 8).unwrap(), &100u64.to_ne_bytes());
    }

    #[test]
    fn large_single_reservation_grows_enough() {
        let arena = GrowingAllocator::new(8);
        let off = arena.alloc(1 << 20, 8).unwrap();
        assert_eq!(off, 0);
        assert!(arena.capacity() >= 1 << 20);
        assert!(arena.bytes(0, 1 << 20).is_ok());
    }

    #[test]
    fn available_is_unbounded() {
        let arena = GrowingAllocator::new(8);
        arena.alloc(1024, 8).unwrap();
        assert_eq!(arena.available(), usize::MAX);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut arena = GrowingAllocator::new(8);
        arena.alloc(100, 8).unwrap();
        let grown = arena.capacity();
        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.capacity(), grown);
        arena.alloc(100, 8).unwrap();
        assert_eq!(arena.relocations(), 1);
    }

    #[test]
    fn offset_outside_reserved_region_is_out_of_range() {
        let arena = GrowingAllocator::new(64);
        arena.alloc(4, 4).unwrap();
        assert!(arena.offset(3).is_ok());
        assert!(matches!(
            arena.offset(4),
            Err(ArenaError::OutOfRange { offset: 4, used: 4, .. })
        ));
    }

    #[test]
    fn unsatisfiable_growth_is_memory_exhausted() {
        let arena = GrowingAllocator::new(8);
        arena.alloc(8, 8).unwrap();
        let err = arena.alloc(usize::MAX / 4, 8).unwrap_err();
        assert!(matches!(err, ArenaError::MemoryExhausted { .. }));
        assert_eq!(arena.used(), 8);
        assert_eq!(arena.capacity(), 8);
        assert_eq!(arena.relocations(), 0);
        assert_eq!(arena.alloc(8, 8).unwrap(), 8);
    }

    #[test]
    #[should_panic]
    fn relocating_while_a_view_is_alive_panics() {
        let arena = GrowingAllocator::new(8);
        arena.alloc(8, 8).unwrap();
        let _view = arena.bytes(0, 8).unwrap();
        let _ = arena.alloc(64, 8);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn contents_survive_every_relocation(
                sizes in proptest::collection::vec(1usize..200, 1..40),
            ) {
                let arena = GrowingAllocator::new(8);
                let mut written: Vec<(usize, u8, usize)> = Vec::new();
                for (i, size) in sizes.into_iter().enumerate() {
                    let off = arena.alloc(size, 1).unwrap();
                    let tag = i as u8;
                    arena.bytes_mut(off, size).unwrap().fill(tag);
                    written.push((off, tag, size));
                }
                for (off, tag, size) in written {
                    let bytes = arena.bytes(off, size).unwrap();
                    prop_assert!(bytes.iter().all(|&b| b == tag));
                }
            }
        }
    }
}
