//! `Pod` implementations for the in-arena headers.
//!
//! This is the only module in the crate allowed to contain `unsafe`.

#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};

use crate::array::ArrayHeader;
use crate::object::ObjectHeader;
use crate::string::StrHeader;

// SAFETY: `ArrayHeader<T>` is `repr(C)` with two `usize` fields and a
// zero-sized `PhantomData<T>`: no padding, and all-zero is a valid value.
unsafe impl<T: Pod> Zeroable for ArrayHeader<T> {}
// SAFETY: as above; every bit pattern of two `usize`s is a valid header.
// `T: Pod` supplies the `'static` bound.
unsafe impl<T: Pod> Pod for ArrayHeader<T> {}

// SAFETY: `ObjectHeader<K, V>` is `repr(C)` with two `ArrayHeader`s (each
// two `usize`s) followed by a `usize`: all fields share one alignment, so
// there is no padding, and all-zero is a valid value.
unsafe impl<K: Pod, V: Pod> Zeroable for ObjectHeader<K, V> {}
// SAFETY: as above; every bit pattern is a valid header.
unsafe impl<K: Pod, V: Pod> Pod for ObjectHeader<K, V> {}

// SAFETY: `StrHeader` is `repr(transparent)` over `ArrayHeader<u8>`, which
// is `Pod` above.
unsafe impl Zeroable for StrHeader {}
// SAFETY: as above.
unsafe impl Pod for StrHeader {}
