//! Containers that live entirely inside a Tarn arena.
//!
//! Everything here is built on one rule: data inside the arena refers to
//! other data by byte offset, and an offset is turned into an address only
//! for the duration of a single access. A growing arena may move its buffer
//! on any reservation, so an address must never be kept across a call that
//! can allocate.
//!
//! ```text
//! Ptr<'a, T>                (offset, &'a dyn Allocator)
//! ArrayHeader<T>            { data: offset, len }       in the arena
//! └── Array<'a, T>          live handle over the header
//! ObjectHeader<K, V>        { keys, vals, count }       in the arena
//! └── Object<'a, K, V>      linear-scan map through a Ptr
//! StrHeader                 ArrayHeader<u8>             in the arena
//! └── Str<'a>               byte string view / copy
//! ```
//!
//! Arena-resident types are [`bytemuck::Pod`]: every bit pattern is a valid
//! value, so reading memory that was reset or never written yields an
//! unspecified value rather than undefined behaviour. Typed views are
//! obtained by safe casts over the allocator's byte views.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod object;
pub mod ptr;
mod raw;
pub mod string;

pub use array::{new_array, Array, ArrayHeader, ArrayIter};
pub use object::{new_object, Entries, Object, ObjectHeader, MIN_GROWTH_CAPACITY};
pub use ptr::{new_value, Ptr};
pub use string::{new_str, new_str_from_bytes, Str, StrHeader, StrKey};
