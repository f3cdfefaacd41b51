//! Test utilities and mock allocators for Tarn development.
//!
//! [`RecordingAllocator`] wraps any [`Allocator`] and records every
//! reservation, so tests can assert on allocation order and sizes. It can
//! also be told to fail after a fixed number of reservations, which drives
//! error paths without exhausting a real arena. [`DescendingAllocator`]
//! places each reservation below the previous one, for code that must not
//! assume offsets grow.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::ptr::NonNull;

use tarn_core::{Allocator, ArenaError, MAX_ALIGN};

/// One successful call to [`Allocator::alloc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reservation {
    pub size: usize,
    pub alignment: usize,
    pub offset: usize,
}

/// An allocator that delegates to `A` and logs reservations.
pub struct RecordingAllocator<A> {
    inner: A,
    log: RefCell<Vec<Reservation>>,
    remaining: Cell<Option<usize>>,
}

impl<A: Allocator> RecordingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            log: RefCell::new(Vec::new()),
            remaining: Cell::new(None),
        }
    }

    /// Succeed for the first `n` reservations, then report
    /// [`ArenaError::MemoryExhausted`] for every later one.
    pub fn failing_after(inner: A, n: usize) -> Self {
        let recorder = Self::new(inner);
        recorder.remaining.set(Some(n));
        recorder
    }

    /// Successful reservations so far, in call order.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.log.borrow().clone()
    }

    /// The wrapped allocator.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Allocator> Allocator for RecordingAllocator<A> {
    fn alloc(&self, size: usize, alignment: usize) -> Result<usize, ArenaError> {
        if let Some(left) = self.remaining.get() {
            if left == 0 {
                return Err(ArenaError::MemoryExhausted {
                    requested: size,
                    available: 0,
                });
            }
            self.remaining.set(Some(left - 1));
        }
        let offset = self.inner.alloc(size, alignment)?;
        self.log.borrow_mut().push(Reservation {
            size,
            alignment,
            offset,
        });
        Ok(offset)
    }

    fn offset(&self, offset: usize) -> Result<NonNull<u8>, ArenaError> {
        self.inner.offset(offset)
    }

    fn available(&self) -> usize {
        match self.remaining.get() {
            Some(0) => 0,
            _ => self.inner.available(),
        }
    }

    fn used(&self) -> usize {
        self.inner.used()
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<Ref<'_, [u8]>, ArenaError> {
        self.inner.bytes(offset, len)
    }

    fn bytes_mut(&self, offset: usize, len: usize) -> Result<RefMut<'_, [u8]>, ArenaError> {
        self.inner.bytes_mut(offset, len)
    }
}

/// A fixed-capacity allocator that reserves from the top of its buffer
/// downward, so every reservation sits at a lower offset than the one
/// before it.
///
/// The reserved region is `[capacity - used, capacity)`.
pub struct DescendingAllocator {
    buf: RefCell<Vec<u64>>,
    capacity: usize,
    low: Cell<usize>,
}

impl DescendingAllocator {
    /// `capacity` is rounded up to whole 8-byte words.
    pub fn new(capacity: usize) -> Self {
        let words = capacity.div_ceil(8);
        Self {
            buf: RefCell::new(vec![0; words]),
            capacity: words * 8,
            low: Cell::new(words * 8),
        }
    }

    fn check(&self, offset: usize, len: usize) -> Result<std::ops::Range<usize>, ArenaError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.capacity && (len == 0 || offset >= self.low.get()) => {
                Ok(offset..end)
            }
            _ => Err(ArenaError::OutOfRange {
                offset,
                len,
                used: self.used(),
            }),
        }
    }
}

impl Allocator for DescendingAllocator {
    fn alloc(&self, size: usize, alignment: usize) -> Result<usize, ArenaError> {
        assert!(
            alignment.is_power_of_two() && alignment <= MAX_ALIGN,
            "unsupported alignment {alignment}"
        );
        let low = self.low.get();
        let start = low
            .checked_sub(size)
            .map(|s| s & !(alignment - 1))
            .ok_or(ArenaError::MemoryExhausted {
                requested: size,
                available: low,
            })?;
        self.low.set(start);
        Ok(start)
    }

    fn offset(&self, offset: usize) -> Result<NonNull<u8>, ArenaError> {
        self.check(offset, 1)?;
        let base = self.buf.borrow().as_ptr().cast::<u8>();
        NonNull::new(base.cast_mut().wrapping_add(offset)).ok_or(ArenaError::OutOfRange {
            offset,
            len: 0,
            used: self.used(),
        })
    }

    fn available(&self) -> usize {
        self.low.get()
    }

    fn used(&self) -> usize {
        self.capacity - self.low.get()
    }

    fn bytes(&self, offset: usize, len: usize) -> Result<Ref<'_, [u8]>, ArenaError> {
        let range = self.check(offset, len)?;
        Ok(Ref::map(self.buf.borrow(), move |words| {
            &bytemuck::cast_slice::<u64, u8>(words)[range]
        }))
    }

    fn bytes_mut(&self, offset: usize, len: usize) -> Result<RefMut<'_, [u8]>, ArenaError> {
        let range = self.check(offset, len)?;
        Ok(RefMut::map(self.buf.borrow_mut(), move |words| {
            &mut bytemuck::cast_slice_mut::<u64, u8>(words)[range]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_arena::PageAllocator;

    #[test]
    fn records_in_call_order() {
        let arena = RecordingAllocator::new(PageAllocator::new());
        arena.alloc(3, 1).unwrap();
        arena.alloc(8, 8).unwrap();
        assert_eq!(
            arena.reservations(),
            vec![
                Reservation { size: 3, alignment: 1, offset: 0 },
                Reservation { size: 8, alignment: 8, offset: 8 },
            ]
        );
    }

    #[test]
    fn failing_after_stops_reserving() {
        let arena = RecordingAllocator::failing_after(PageAllocator::new(), 1);
        assert!(arena.alloc(8, 8).is_ok());
        let err = arena.alloc(8, 8).unwrap_err();
        assert_eq!(err, ArenaError::MemoryExhausted { requested: 8, available: 0 });
        assert_eq!(arena.reservations().len(), 1);
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn descending_reservations_move_down() {
        let arena = DescendingAllocator::new(64);
        assert_eq!(arena.alloc(8, 8).unwrap(), 56);
        assert_eq!(arena.alloc(3, 4).unwrap(), 52);
        assert_eq!(arena.used(), 12);
        arena.bytes_mut(52, 3).unwrap().copy_from_slice(b"abc");
        assert_eq!(&*arena.bytes(52, 3).unwrap(), b"abc");
        assert!(arena.bytes(40, 4).is_err());
        assert!(matches!(
            arena.alloc(64, 8),
            Err(ArenaError::MemoryExhausted { .. })
        ));
    }
}
