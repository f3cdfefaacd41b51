//! Bump allocators for Tarn.
//!
//! Both allocators implement [`tarn_core::Allocator`]: they hand out byte
//! offsets into a buffer they own and resolve those offsets on demand.
//!
//! ```text
//! PageAllocator     one inline 4096-byte page, fails when full, never moves
//! GrowingAllocator  Vec-backed, doubles on overflow by copy-and-relocate
//! ```
//!
//! Neither allocator frees individual reservations. `reset` discards every
//! reservation at once and requires `&mut self`, so no borrowed pointer can
//! outlive it.
//!
//! Buffers are stored as 8-byte words, which makes every offset aligned to
//! [`MAX_ALIGN`](tarn_core::MAX_ALIGN) or less a correctly aligned address.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod bump;
pub mod config;
pub mod growing;
pub mod page;

pub use config::ArenaConfig;
pub use growing::GrowingAllocator;
pub use page::{PageAllocator, PAGE_SIZE};
