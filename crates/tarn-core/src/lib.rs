//! Core types and traits for the Tarn arena.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! allocator capability every arena implements, the key-conversion trait
//! used by associative containers, the shared error type, and the
//! alignment arithmetic both allocators rely on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod align;
pub mod error;
pub mod traits;

pub use align::{align_up, MAX_ALIGN};
pub use error::ArenaError;
pub use traits::{Allocator, ToNative};
