//! Typed arrays stored in an arena.
//!
//! An array is two reservations: the element storage and an
//! [`ArrayHeader`] recording its offset and length. The header is itself an
//! arena value, so it can be embedded in other arena values (see
//! [`Object`](crate::Object)). [`Array`] is the live form of a header,
//! paired with the allocator it resolves through.

use std::cell::{Ref, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};

use bytemuck::Pod;
use tarn_core::{Allocator, ArenaError};

use crate::ptr::{new_value, Ptr};

/// Arena-resident array header: element offset and length.
#[repr(C)]
pub struct ArrayHeader<T> {
    data: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> ArrayHeader<T> {
    fn new(data: usize, len: usize) -> Self {
        Self {
            data,
            len,
            _marker: PhantomData,
        }
    }

    /// Offset of the first element.
    pub fn data_offset(&self) -> usize {
        self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Clone for ArrayHeader<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayHeader<T> {}

impl<T> PartialEq for ArrayHeader<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.len == other.len
    }
}

impl<T> Eq for ArrayHeader<T> {}

impl<T> fmt::Debug for ArrayHeader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayHeader")
            .field("data", &self.data)
            .field("len", &self.len)
            .finish()
    }
}

/// A live array: a header value bound to its allocator.
///
/// Cheap to copy. Every access re-resolves the element storage, so an
/// `Array` stays usable across relocations; the views it returns do not.
pub struct Array<'a, T> {
    data: Ptr<'a, T>,
    len: usize,
}

impl<'a, T: Pod> Array<'a, T> {
    /// Bind a header read from the arena to the allocator that owns it.
    pub fn from_header(alloc: &'a dyn Allocator, header: ArrayHeader<T>) -> Self {
        Self {
            data: Ptr::new(alloc, header.data),
            len: header.len,
        }
    }

    /// The arena-resident form of this array.
    pub fn header(&self) -> ArrayHeader<T> {
        ArrayHeader::new(self.data.offset(), self.len)
    }

    /// Pointer to the first element.
    pub fn data(&self) -> Ptr<'a, T> {
        self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn byte_len(&self) -> usize {
        self.len * size_of::<T>()
    }

    /// Byte range of the elements; an empty array maps to the empty range
    /// at offset zero instead of its own data offset.
    fn span(&self) -> (usize, usize) {
        if self.len == 0 {
            (0, 0)
        } else {
            (self.data.offset(), self.byte_len())
        }
    }

    /// Live view of the elements.
    ///
    /// Recomputed from the header on each call. The view borrows the arena
    /// buffer, so allocating while it is alive panics in a growing arena.
    pub fn view(&self) -> Result<Ref<'a, [T]>, ArenaError> {
        let (offset, len) = self.span();
        let bytes = self.data.arena().bytes(offset, len)?;
        Ok(Ref::map(bytes, bytemuck::cast_slice::<u8, T>))
    }

    /// Mutable live view of the elements.
    pub fn view_mut(&self) -> Result<RefMut<'a, [T]>, ArenaError> {
        let (offset, len) = self.span();
        let bytes = self.data.arena().bytes_mut(offset, len)?;
        Ok(RefMut::map(bytes, bytemuck::cast_slice_mut::<u8, T>))
    }

    /// Pointer to element `index`, or `None` past the end.
    pub fn element(&self, index: usize) -> Option<Ptr<'a, T>> {
        (index < self.len).then(|| {
            Ptr::new(
                self.data.arena(),
                self.data.offset() + index * size_of::<T>(),
            )
        })
    }

    /// Copy out element `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Result<Option<T>, ArenaError> {
        self.element(index).map(|p| p.read()).transpose()
    }

    /// Overwrite element `index`.
    ///
    /// Returns [`ArenaError::OutOfRange`] when `index >= len`.
    pub fn set(&self, index: usize, value: T) -> Result<(), ArenaError> {
        let element = self.element(index).ok_or(ArenaError::OutOfRange {
            offset: self.data.offset() + index.saturating_mul(size_of::<T>()),
            len: size_of::<T>(),
            used: self.data.arena().used(),
        })?;
        element.set(value)
    }

    /// Copy every element into an owned vector.
    pub fn to_vec(&self) -> Result<Vec<T>, ArenaError> {
        Ok(self.view()?.to_vec())
    }

    /// Iterate over copies of the elements.
    ///
    /// The iterator holds a view of the arena buffer for its lifetime.
    pub fn iter(&self) -> Result<ArrayIter<'a, T>, ArenaError> {
        let view = self.view()?;
        let end = view.len();
        Ok(ArrayIter {
            view,
            index: 0,
            end,
        })
    }

    /// Allocate a larger array, copy this array's elements into its prefix,
    /// and return the new header by value.
    ///
    /// Elements `[len, new_len)` of the result are unspecified until
    /// written. The original storage is not released; the caller replaces
    /// any stored header with the returned one.
    ///
    /// # Panics
    ///
    /// Panics if `new_len <= self.len()`.
    pub fn expand(&self, new_len: usize) -> Result<Array<'a, T>, ArenaError> {
        assert!(
            new_len > self.len,
            "expanded length {new_len} must exceed current length {}",
            self.len
        );
        let alloc = self.data.arena();
        let grown = new_array::<T>(alloc, new_len)?.load()?;
        if self.len > 0 {
            let len = self.byte_len();
            let src = self.data.offset();
            let dst = grown.data.offset();
            // One view spanning both ranges, in whichever order the
            // allocator placed them.
            let lo = src.min(dst);
            let hi = src.max(dst) + len;
            let mut span = alloc.bytes_mut(lo, hi - lo)?;
            span.copy_within(src - lo..src - lo + len, dst - lo);
        }
        Ok(grown)
    }
}

impl<T> Clone for Array<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Array<'_, T> {}

impl<T> fmt::Debug for Array<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("data", &self.data)
            .field("len", &self.len)
            .finish()
    }
}

/// Iterator over copies of an array's elements.
pub struct ArrayIter<'a, T> {
    view: Ref<'a, [T]>,
    index: usize,
    end: usize,
}

impl<T> ArrayIter<'_, T> {
    /// Stop after at most `len` elements.
    pub(crate) fn truncate(mut self, len: usize) -> Self {
        self.end = self.end.min(len);
        self
    }
}

impl<T: Pod> Iterator for ArrayIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.index >= self.end {
            return None;
        }
        let value = self.view[self.index];
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.index;
        (remaining, Some(remaining))
    }
}

impl<T: Pod> ExactSizeIterator for ArrayIter<'_, T> {}

/// Reserve an array of `len` elements and return a pointer to its header.
///
/// Element storage is reserved before the header, so a relocation
/// triggered by the header reservation cannot invalidate anything already
/// computed: only offsets are held across the two calls. Element contents
/// are unspecified until written.
///
/// # Panics
///
/// Panics if `T` is zero-sized or aligned beyond
/// [`tarn_core::MAX_ALIGN`].
pub fn new_array<'a, T: Pod>(
    alloc: &'a dyn Allocator,
    len: usize,
) -> Result<Ptr<'a, ArrayHeader<T>>, ArenaError> {
    assert!(
        size_of::<T>() != 0,
        "zero-sized element types cannot be stored in an arena array"
    );
    let bytes = size_of::<T>()
        .checked_mul(len)
        .ok_or(ArenaError::MemoryExhausted {
            requested: usize::MAX,
            available: alloc.available(),
        })?;
    let data = alloc.alloc(bytes, align_of::<T>())?;
    let header = new_value::<ArrayHeader<T>>(alloc)?;
    header.set(ArrayHeader::new(data, len))?;
    Ok(header)
}

impl<'a, T: Pod> Ptr<'a, ArrayHeader<T>> {
    /// Read the header and bind it to this pointer's allocator.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn load(&self) -> Result<Array<'a, T>, ArenaError> {
        Ok(Array::from_header(self.arena(), self.read()?))
    }

    /// Replace the stored header, typically with the result of
    /// [`Array::expand`].
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn store(&self, array: Array<'a, T>) -> Result<(), ArenaError> {
        self.set(array.header())
    }
}
