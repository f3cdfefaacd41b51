//! Benchmark workloads for the Tarn allocators and collections.
//!
//! - [`fill_with_blocks`]: reserve and touch fixed-size blocks until a
//!   count is reached, the per-reset workload of the allocation benches
//! - [`build_string_object`]: a string-keyed object with one entry per key

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tarn_collections::{new_object, new_str, Object, StrHeader};
use tarn_core::{Allocator, ArenaError};

/// Size of one block in the allocation workloads.
pub const BLOCK_BYTES: usize = 1024;

/// Reserve `count` blocks of [`BLOCK_BYTES`] and write the first byte of
/// each. Returns the offset of the last block.
pub fn fill_with_blocks(alloc: &dyn Allocator, count: usize) -> Result<usize, ArenaError> {
    let mut last = 0;
    for i in 0..count {
        last = alloc.alloc(BLOCK_BYTES, 8)?;
        alloc.bytes_mut(last, 1)?[0] = i as u8;
    }
    Ok(last)
}

/// Build an object mapping each key to its index, starting from capacity
/// one so every growth step is exercised.
pub fn build_string_object<'a>(
    alloc: &'a dyn Allocator,
    keys: &[String],
) -> Result<Object<'a, StrHeader, u64>, ArenaError> {
    let obj = new_object::<StrHeader, u64>(alloc, 1)?;
    for (i, key) in keys.iter().enumerate() {
        obj.set(new_str(alloc, key)?.read()?, i as u64)?;
    }
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_arena::{GrowingAllocator, PageAllocator};

    #[test]
    fn blocks_fill_a_growing_arena() {
        let arena = GrowingAllocator::default();
        let last = fill_with_blocks(&arena, 1000).unwrap();
        assert_eq!(last, 999 * BLOCK_BYTES);
        assert_eq!(arena.used(), 1000 * BLOCK_BYTES);
    }

    #[test]
    fn blocks_exhaust_a_page() {
        let arena = PageAllocator::new();
        assert!(fill_with_blocks(&arena, 4).is_ok());
        assert!(matches!(
            fill_with_blocks(&arena, 1),
            Err(ArenaError::MemoryExhausted { .. })
        ));
    }

    #[test]
    fn string_object_has_every_key() {
        let arena = GrowingAllocator::default();
        let keys: Vec<String> = (0..50).map(|i| format!("k{i}")).collect();
        let obj = build_string_object(&arena, &keys).unwrap();
        assert_eq!(obj.count().unwrap(), 50);
        assert_eq!(obj.get("k49").unwrap(), Some(49));
    }
}
