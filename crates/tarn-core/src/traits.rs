//! Core abstraction traits: the allocator capability and key conversion.

use std::cell::{Ref, RefMut};
use std::ptr::NonNull;

use crate::error::ArenaError;

/// The capability every arena implements.
///
/// An allocator hands out byte offsets into a buffer it owns. Offsets stay
/// valid for the allocator's lifetime (until it is reset); raw addresses do
/// not, because a growing arena may move its buffer on any `alloc`. Callers
/// hold offsets and re-resolve them on each access.
///
/// Methods take `&self` so that many logical pointers can share one arena.
/// Implementations use interior mutability and are not `Sync`.
pub trait Allocator {
    /// Reserve `size` bytes at the next multiple of `alignment` at or after
    /// the cursor, returning the start offset.
    ///
    /// On error the cursor is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two or exceeds
    /// [`MAX_ALIGN`](crate::MAX_ALIGN), or if the buffer is currently
    /// borrowed by a view and must be written.
    fn alloc(&self, size: usize, alignment: usize) -> Result<usize, ArenaError>;

    /// Resolve `offset` to its address in the current buffer.
    ///
    /// The address is only meaningful until the next call that may allocate.
    /// Returns [`ArenaError::OutOfRange`] unless `offset < self.used()`.
    fn offset(&self, offset: usize) -> Result<NonNull<u8>, ArenaError>;

    /// Bytes that can be reserved before the arena must grow or fail.
    fn available(&self) -> usize;

    /// Bytes reserved so far (the bump cursor).
    fn used(&self) -> usize;

    /// Shared view of `len` bytes starting at `offset`.
    ///
    /// Returns [`ArenaError::OutOfRange`] unless `offset + len <= self.used()`.
    fn bytes(&self, offset: usize, len: usize) -> Result<Ref<'_, [u8]>, ArenaError>;

    /// Mutable view of `len` bytes starting at `offset`.
    ///
    /// Returns [`ArenaError::OutOfRange`] unless `offset + len <= self.used()`.
    fn bytes_mut(&self, offset: usize, len: usize) -> Result<RefMut<'_, [u8]>, ArenaError>;
}

/// Conversion from an arena-resident value to a host-native comparable one.
///
/// Associative containers compare keys through this conversion, so two keys
/// that live at different offsets but hold the same content are equal.
pub trait ToNative {
    /// The host-native representation.
    type Native: PartialEq;

    /// Convert, resolving any arena references through `alloc`.
    fn to_native(&self, alloc: &dyn Allocator) -> Result<Self::Native, ArenaError>;
}

macro_rules! impl_to_native_identity {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToNative for $t {
                type Native = $t;

                #[inline]
                fn to_native(&self, _alloc: &dyn Allocator) -> Result<$t, ArenaError> {
                    Ok(*self)
                }
            }
        )*
    };
}

impl_to_native_identity!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
