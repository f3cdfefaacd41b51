//! Linear-scan associative container stored in an arena.
//!
//! An object is a header holding two parallel arrays (keys and values) of
//! equal capacity plus an entry count. Lookup compares each key's
//! host-native form ([`ToNative`]) against the query, in insertion order.
//! There is no hashing: lookups are O(count), in exchange for keeping every
//! entry in two contiguous runs of arena memory.
//!
//! When the arrays are full, insertion grows both to
//! `max(count * 2, MIN_GROWTH_CAPACITY)`. Growth copies the existing
//! entries and changes the capacity only; the entry count is untouched.

use std::cell::Ref;
use std::fmt;

use bytemuck::Pod;
use tarn_core::{Allocator, ArenaError, ToNative};
use tracing::trace;

use crate::array::{new_array, Array, ArrayHeader, ArrayIter};
use crate::ptr::{new_value, Ptr};

/// Capacity an object grows to from small sizes.
pub const MIN_GROWTH_CAPACITY: usize = 10;

/// Arena-resident object header.
#[repr(C)]
pub struct ObjectHeader<K, V> {
    keys: ArrayHeader<K>,
    vals: ArrayHeader<V>,
    count: usize,
}

impl<K, V> ObjectHeader<K, V> {
    /// Number of entries.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of entries that fit before the next growth.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    fn is_full(&self) -> bool {
        self.count >= self.capacity()
    }
}

impl<K, V> Clone for ObjectHeader<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for ObjectHeader<K, V> {}

impl<K, V> fmt::Debug for ObjectHeader<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeader")
            .field("keys", &self.keys)
            .field("vals", &self.vals)
            .field("count", &self.count)
            .finish()
    }
}

/// An unordered map from `K` to `V` living in an arena.
///
/// `K` is the arena-resident key type; lookups take anything its native
/// form (`K::Native`) compares equal with. For string keys
/// ([`StrHeader`](crate::StrHeader)) that means plain `&str` or `&[u8]`.
///
/// The handle is a [`Ptr`] to the header; every operation re-reads the
/// header, so handles stay valid across relocations and can be copied
/// freely.
pub struct Object<'a, K, V> {
    ptr: Ptr<'a, ObjectHeader<K, V>>,
}

impl<'a, K, V> Object<'a, K, V>
where
    K: Pod + ToNative,
    V: Pod,
{
    /// Wrap a pointer to an existing object header.
    pub fn from_ptr(ptr: Ptr<'a, ObjectHeader<K, V>>) -> Self {
        Self { ptr }
    }

    /// Pointer to the header, for storing the object inside other arena
    /// values.
    pub fn as_ptr(&self) -> Ptr<'a, ObjectHeader<K, V>> {
        self.ptr
    }

    fn arena(&self) -> &'a dyn Allocator {
        self.ptr.arena()
    }

    /// Read the current header.
    pub fn header(&self) -> Result<ObjectHeader<K, V>, ArenaError> {
        self.ptr.read()
    }

    /// Number of entries.
    pub fn count(&self) -> Result<usize, ArenaError> {
        Ok(self.header()?.count)
    }

    /// Number of entries that fit before the next growth.
    pub fn capacity(&self) -> Result<usize, ArenaError> {
        Ok(self.header()?.capacity())
    }

    /// Whether the object has no entries.
    pub fn is_empty(&self) -> Result<bool, ArenaError> {
        Ok(self.count()? == 0)
    }

    fn keys_array(&self, header: &ObjectHeader<K, V>) -> Array<'a, K> {
        Array::from_header(self.arena(), header.keys)
    }

    fn vals_array(&self, header: &ObjectHeader<K, V>) -> Array<'a, V> {
        Array::from_header(self.arena(), header.vals)
    }

    /// Index of the entry whose key converts to `key`.
    pub fn lookup<Q>(&self, key: &Q) -> Result<Option<usize>, ArenaError>
    where
        K::Native: PartialEq<Q>,
        Q: ?Sized,
    {
        let header = self.header()?;
        let alloc = self.arena();
        let keys = self.keys_array(&header).view()?;
        for (index, stored) in keys[..header.count].iter().enumerate() {
            if PartialEq::<Q>::eq(&stored.to_native(alloc)?, key) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Insert or update an entry.
    ///
    /// An existing key has its value overwritten in place; the count and
    /// capacity do not change. A new key is appended, growing the object
    /// first when it is full.
    pub fn set(&self, key: K, value: V) -> Result<(), ArenaError> {
        let native = key.to_native(self.arena())?;
        if let Some(index) = self.lookup::<K::Native>(&native)? {
            let header = self.header()?;
            return self.vals_array(&header).set(index, value);
        }

        let mut header = self.header()?;
        if header.is_full() {
            header = self.grow(header)?;
        }
        self.keys_array(&header).set(header.count, key)?;
        self.vals_array(&header).set(header.count, value)?;
        header.count += 1;
        self.ptr.set(header)
    }

    /// Replace both arrays with larger copies. The count is preserved.
    fn grow(&self, mut header: ObjectHeader<K, V>) -> Result<ObjectHeader<K, V>, ArenaError> {
        let old_capacity = header.capacity();
        let new_capacity = header.count.saturating_mul(2).max(MIN_GROWTH_CAPACITY);
        let keys = self.keys_array(&header).expand(new_capacity)?;
        let vals = self.vals_array(&header).expand(new_capacity)?;
        header.keys = keys.header();
        header.vals = vals.header();
        self.ptr.set(header)?;
        trace!(
            count = header.count,
            old_capacity,
            new_capacity,
            "grew arena object"
        );
        Ok(header)
    }

    /// Copy out the value stored under `key`, or `None` if absent.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>, ArenaError>
    where
        K::Native: PartialEq<Q>,
        Q: ?Sized,
    {
        match self.lookup(key)? {
            Some(index) => {
                let header = self.header()?;
                self.vals_array(&header).get(index)
            }
            None => Ok(None),
        }
    }

    /// Whether an entry exists for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool, ArenaError>
    where
        K::Native: PartialEq<Q>,
        Q: ?Sized,
    {
        Ok(self.lookup(key)?.is_some())
    }

    /// Iterate over `(key, value)` pairs in storage order.
    ///
    /// Keys are yielded in their arena form. The iterator borrows the arena
    /// buffer: inserting while it is alive panics.
    pub fn iter(&self) -> Result<Entries<'a, K, V>, ArenaError> {
        let header = self.header()?;
        Ok(Entries {
            keys: self.keys_array(&header).view()?,
            vals: self.vals_array(&header).view()?,
            index: 0,
            count: header.count,
        })
    }

    /// Iterate over keys in their arena form.
    pub fn keys(&self) -> Result<ArrayIter<'a, K>, ArenaError> {
        let header = self.header()?;
        Ok(self.keys_array(&header).iter()?.truncate(header.count))
    }

    /// Iterate over values.
    pub fn values(&self) -> Result<ArrayIter<'a, V>, ArenaError> {
        let header = self.header()?;
        Ok(self.vals_array(&header).iter()?.truncate(header.count))
    }

    /// Iterate over keys converted to their native form.
    pub fn native_keys(
        &self,
    ) -> Result<impl Iterator<Item = Result<K::Native, ArenaError>> + 'a, ArenaError> {
        let alloc = self.arena();
        Ok(self.keys()?.map(move |key| key.to_native(alloc)))
    }

    /// Iterate over `(native key, value)` pairs in storage order.
    pub fn native_iter(
        &self,
    ) -> Result<impl Iterator<Item = Result<(K::Native, V), ArenaError>> + 'a, ArenaError> {
        let alloc = self.arena();
        Ok(self
            .iter()?
            .map(move |(key, value)| -> Result<(K::Native, V), ArenaError> {
                Ok((key.to_native(alloc)?, value))
            }))
    }
}

impl<K, V> Clone for Object<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Object<'_, K, V> {}

impl<K, V> fmt::Debug for Object<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.ptr).finish()
    }
}

/// Iterator over an object's `(key, value)` pairs.
pub struct Entries<'a, K, V> {
    keys: Ref<'a, [K]>,
    vals: Ref<'a, [V]>,
    index: usize,
    count: usize,
}

impl<K: Pod, V: Pod> Iterator for Entries<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.index >= self.count {
            return None;
        }
        let entry = (self.keys[self.index], self.vals[self.index]);
        self.index += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl<K: Pod, V: Pod> ExactSizeIterator for Entries<'_, K, V> {}

/// Create an empty object with room for `initial_capacity` entries.
///
/// # Panics
///
/// Panics if `K` or `V` is zero-sized or aligned beyond
/// [`tarn_core::MAX_ALIGN`].
pub fn new_object<'a, K, V>(
    alloc: &'a dyn Allocator,
    initial_capacity: usize,
) -> Result<Object<'a, K, V>, ArenaError>
where
    K: Pod + ToNative,
    V: Pod,
{
    let ptr = new_value::<ObjectHeader<K, V>>(alloc)?;
    let keys = new_array::<K>(alloc, initial_capacity)?.read()?;
    let vals = new_array::<V>(alloc, initial_capacity)?.read()?;
    ptr.set(ObjectHeader {
        keys,
        vals,
        count: 0,
    })?;
    Ok(Object { ptr })
}
