//! Byte strings stored in an arena.
//!
//! A string is a `u8` array. [`Str`] offers a borrowed view of the bytes,
//! an owned copy that is independent of the arena, and lexicographic
//! comparison. [`StrHeader`] converts to a native [`StrKey`], so objects
//! keyed by arena strings are indexed with ordinary `&str` or `&[u8]`
//! values. Content is arbitrary bytes; UTF-8 is only checked by
//! [`Str::as_str`].

use std::cell::Ref;
use std::cmp::Ordering;

use tarn_core::{Allocator, ArenaError, ToNative};

use crate::array::{new_array, Array, ArrayHeader};
use crate::ptr::Ptr;

/// Arena-resident string header.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrHeader(ArrayHeader<u8>);

impl StrHeader {
    /// Length of the string in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ToNative for StrHeader {
    type Native = StrKey;

    /// Copy the content out as bytes. Never fails on content: keys built
    /// from non-UTF-8 bytes compare byte for byte like any other.
    fn to_native(&self, alloc: &dyn Allocator) -> Result<StrKey, ArenaError> {
        Ok(StrKey(Str::from_header(alloc, *self).to_vec()?))
    }
}

/// Host-native form of an arena string: its bytes, compared byte for byte.
///
/// Compares equal with `str`, `[u8]`, `String` and `Vec<u8>` holding the
/// same bytes, which is what lets `Object<StrHeader, V>::get("key")` work.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrKey(Vec<u8>);

impl StrKey {
    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The content as `str`, if it is UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Give up the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<&str> for StrKey {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for StrKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq<[u8]> for StrKey {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<str> for StrKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for StrKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<String> for StrKey {
    fn eq(&self, other: &String) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<Vec<u8>> for StrKey {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.0 == other
    }
}

/// A live string: a header bound to its allocator.
#[derive(Clone, Copy, Debug)]
pub struct Str<'a> {
    bytes: Array<'a, u8>,
}

impl<'a> Str<'a> {
    /// Bind a header read from the arena to the allocator that owns it.
    pub fn from_header(alloc: &'a dyn Allocator, header: StrHeader) -> Self {
        Self {
            bytes: Array::from_header(alloc, header.0),
        }
    }

    /// The arena-resident form of this string.
    pub fn header(&self) -> StrHeader {
        StrHeader(self.bytes.header())
    }

    /// The underlying byte array.
    pub fn as_array(&self) -> Array<'a, u8> {
        self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Zero-copy view of the bytes.
    ///
    /// Valid while the guard lives; it reflects later writes to the backing
    /// array. An empty string yields an empty view without resolving its
    /// data offset.
    pub fn as_bytes(&self) -> Result<Ref<'a, [u8]>, ArenaError> {
        self.bytes.view()
    }

    /// Zero-copy view of the content as `str`.
    ///
    /// Returns [`ArenaError::InvalidUtf8`] if the bytes are not UTF-8.
    pub fn as_str(&self) -> Result<Ref<'a, str>, ArenaError> {
        let offset = self.bytes.data().offset();
        Ref::filter_map(self.as_bytes()?, |b| std::str::from_utf8(b).ok())
            .map_err(|_| ArenaError::InvalidUtf8 { offset })
    }

    /// Owned copy of the bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, ArenaError> {
        self.bytes.to_vec()
    }

    /// Owned copy of the content, replacing invalid UTF-8 sequences with
    /// `U+FFFD`. Unaffected by later writes to the arena.
    pub fn to_owned_string(&self) -> Result<String, ArenaError> {
        Ok(String::from_utf8_lossy(&self.as_bytes()?).into_owned())
    }

    /// Three-way lexicographic comparison of the bytes.
    pub fn cmp_str(&self, other: &Str<'_>) -> Result<Ordering, ArenaError> {
        Ok(self.as_bytes()?[..].cmp(&other.as_bytes()?[..]))
    }
}

/// Copy `s` into the arena as a string.
pub fn new_str<'a>(alloc: &'a dyn Allocator, s: &str) -> Result<Ptr<'a, StrHeader>, ArenaError> {
    new_str_from_bytes(alloc, s.as_bytes())
}

/// Copy raw bytes into the arena as a string.
pub fn new_str_from_bytes<'a>(
    alloc: &'a dyn Allocator,
    bytes: &[u8],
) -> Result<Ptr<'a, StrHeader>, ArenaError> {
    let header = new_array::<u8>(alloc, bytes.len())?;
    header.load()?.view_mut()?.copy_from_slice(bytes);
    Ok(header.cast())
}

impl<'a> Ptr<'a, StrHeader> {
    /// Read the header and bind it to this pointer's allocator.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is null.
    pub fn load(&self) -> Result<Str<'a>, ArenaError> {
        Ok(Str::from_header(self.arena(), self.read()?))
    }
}
