//! Logical pointers into an arena.
//!
//! A [`Ptr`] pairs an allocator reference with a byte offset and resolves
//! the pair on every access. It never caches an address, so it stays valid
//! when a growing arena relocates its buffer.

use std::cell::{Ref, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ptr::NonNull;

use bytemuck::Pod;
use tarn_core::{Allocator, ArenaError};

/// A relocation-safe pointer to a `T` stored in an arena.
///
/// The `'a` borrow ties the pointer to its allocator: the allocator cannot
/// be reset or dropped while the pointer exists. A pointer with no
/// allocator is null; its offset is meaningless.
#[must_use]
pub struct Ptr<'a, T> {
    offset: usize,
    alloc: Option<&'a dyn Allocator>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> Ptr<'a, T> {
    pub(crate) fn new(alloc: &'a dyn Allocator, offset: usize) -> Self {
        Self {
            offset,
            alloc: Some(alloc),
            _marker: PhantomData,
        }
    }

    /// A pointer that refers to nothing.
    pub fn null() -> Self {
        Self {
            offset: 0,
            alloc: None,
            _marker: PhantomData,
        }
    }

    /// Whether this pointer carries no allocator.
    pub fn is_null(&self) -> bool {
        self.alloc.is_none()
    }

    /// Drop the allocator reference, making the pointer null.
    pub fn set_null(&mut self) {
        self.alloc = None;
    }

    /// Byte offset of the pointee within its arena.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The allocator this pointer resolves through, if any.
    pub fn allocator(&self) -> Option<&'a dyn Allocator> {
        self.alloc
    }

    /// The allocator, for pointers that must not be null.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub(crate) fn arena(&self) -> &'a dyn Allocator {
        match self.alloc {
            Some(alloc) => alloc,
            None => panic!("dereferenced a null Ptr"),
        }
    }

    /// Reinterpret the pointee type. Layout compatibility is checked when
    /// the new pointer is read.
    pub(crate) fn cast<U>(self) -> Ptr<'a, U> {
        Ptr {
            offset: self.offset,
            alloc: self.alloc,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: Pod> Ptr<'a, T> {
    /// Current address of the pointee.
    ///
    /// Stale after any call that may allocate; re-resolve instead of
    /// keeping it.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn address(&self) -> Result<NonNull<T>, ArenaError> {
        Ok(self.arena().offset(self.offset)?.cast())
    }

    /// Borrow the pointee.
    ///
    /// The returned guard borrows the arena buffer: a growing arena cannot
    /// relocate while it is alive.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn view(&self) -> Result<Ref<'a, T>, ArenaError> {
        let bytes = self.arena().bytes(self.offset, size_of::<T>())?;
        Ok(Ref::map(bytes, bytemuck::from_bytes::<T>))
    }

    /// Mutably borrow the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn view_mut(&self) -> Result<RefMut<'a, T>, ArenaError> {
        let bytes = self.arena().bytes_mut(self.offset, size_of::<T>())?;
        Ok(RefMut::map(bytes, bytemuck::from_bytes_mut::<T>))
    }

    /// Copy the pointee out.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn read(&self) -> Result<T, ArenaError> {
        Ok(*self.view()?)
    }

    /// Overwrite the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn set(&self, value: T) -> Result<(), ArenaError> {
        *self.view_mut()? = value;
        Ok(())
    }

    /// The raw bytes of the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn as_bytes(&self) -> Result<Vec<u8>, ArenaError> {
        Ok(self.arena().bytes(self.offset, size_of::<T>())?.to_vec())
    }
}

/// Reserve storage for one `T` and return a pointer to it.
///
/// The contents are unspecified until written with [`Ptr::set`].
///
/// # Panics
///
/// Panics if `align_of::<T>()` exceeds [`tarn_core::MAX_ALIGN`].
pub fn new_value<'a, T: Pod>(alloc: &'a dyn Allocator) -> Result<Ptr<'a, T>, ArenaError> {
    let offset = alloc.alloc(size_of::<T>(), align_of::<T>())?;
    Ok(Ptr::new(alloc, offset))
}

impl<T> Clone for Ptr<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ptr<'_, T> {}

impl<T> Default for Ptr<'_, T> {
    fn default() -> Self {
        Self::null()
    }
}

/// Pointers are equal when they share an allocator and an offset. Two null
/// pointers are equal; pointers into different allocators never are.
impl<T> PartialEq for Ptr<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.alloc, other.alloc) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(a, b) && self.offset == other.offset,
            _ => false,
        }
    }
}

impl<T> Eq for Ptr<'_, T> {}

impl<T> fmt::Debug for Ptr<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Ptr(null)")
        } else {
            write!(f, "Ptr(offset={})", self.offset)
        }
    }
}
