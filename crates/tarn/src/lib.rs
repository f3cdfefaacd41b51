//! Tarn: bump-allocated arenas with relocation-safe data structures.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tarn sub-crates. For most users, adding `tarn` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tarn::prelude::*;
//!
//! // A growing arena starts small and relocates as it fills.
//! let arena = GrowingAllocator::new(64);
//!
//! // A string-keyed map living entirely inside the arena.
//! let settings = new_object::<StrHeader, u64>(&arena, 1)?;
//! for (name, value) in [("width", 640), ("height", 480)] {
//!     settings.set(new_str(&arena, name)?.read()?, value)?;
//! }
//! assert_eq!(settings.get("height")?, Some(480));
//! assert_eq!(settings.count()?, 2);
//!
//! // Strings offer a zero-copy view and an owned copy.
//! let greeting = new_str(&arena, "hello")?.load()?;
//! assert_eq!(&*greeting.as_str()?, "hello");
//! assert_eq!(greeting.to_owned_string()?, "hello");
//!
//! // A fixed page is reused wholesale after a reset.
//! let mut page = PageAllocator::new();
//! new_value::<u64>(&page)?.set(7)?;
//! page.reset();
//! assert_eq!(page.used(), 0);
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tarn-core` | `Allocator` and `ToNative` traits, `ArenaError`, alignment |
//! | [`arena`] | `tarn-arena` | `PageAllocator`, `GrowingAllocator`, `ArenaConfig` |
//! | [`collections`] | `tarn-collections` | `Ptr`, arrays, objects, strings |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core traits, errors and alignment helpers (`tarn-core`).
///
/// Implement [`types::Allocator`] to plug a custom arena into the
/// collections.
pub use tarn_core as types;

/// Allocators (`tarn-arena`).
///
/// [`arena::PageAllocator`] is a single fixed 4 KiB page;
/// [`arena::GrowingAllocator`] grows without bound by relocating its
/// buffer.
pub use tarn_arena as arena;

/// Data structures stored in an arena (`tarn-collections`).
pub use tarn_collections as collections;

/// Common imports for typical Tarn usage.
///
/// ```rust
/// use tarn::prelude::*;
/// ```
pub mod prelude {
    // Traits and errors
    pub use tarn_core::{Allocator, ArenaError, ToNative};

    // Allocators
    pub use tarn_arena::{ArenaConfig, GrowingAllocator, PageAllocator};

    // Collections
    pub use tarn_collections::{
        new_array, new_object, new_str, new_value, Array, ArrayHeader, Object, ObjectHeader, Ptr,
        Str, StrHeader, StrKey,
    };
}
