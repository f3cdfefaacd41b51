//! Contract checks run against every allocator through `&dyn Allocator`.

use tarn_arena::{ArenaConfig, GrowingAllocator, PageAllocator, PAGE_SIZE};
use tarn_core::{Allocator, ArenaError};

fn check_disjoint_and_aligned(alloc: &dyn Allocator) {
    let mut ranges = Vec::new();
    for (size, alignment) in [(1, 1), (8, 8), (3, 2), (4, 4), (16, 8), (0, 8), (5, 1)] {
        let off = alloc.alloc(size, alignment).unwrap();
        assert_eq!(off % alignment, 0, "offset {off} not aligned to {alignment}");
        for &(s, e) in &ranges {
            assert!(off + size <= s || off >= e || size == 0);
        }
        ranges.push((off, off + size));
    }
}

fn check_offsets_resolve(alloc: &dyn Allocator) {
    let off = alloc.alloc(8, 8).unwrap();
    alloc
        .bytes_mut(off, 8)
        .unwrap()
        .copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let addr = alloc.offset(off).unwrap();
    assert_eq!(addr.as_ptr() as usize % 8, 0);
    assert_eq!(&*alloc.bytes(off, 8).unwrap(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(matches!(
        alloc.offset(alloc.used()),
        Err(ArenaError::OutOfRange { .. })
    ));
}

fn check_used_tracks_cursor(alloc: &dyn Allocator) {
    let start = alloc.used();
    let off = alloc.alloc(10, 1).unwrap();
    assert_eq!(off, start);
    assert_eq!(alloc.used(), start + 10);
}

#[test]
fn page_allocator_satisfies_contract() {
    check_disjoint_and_aligned(&PageAllocator::new());
    check_offsets_resolve(&PageAllocator::new());
    check_used_tracks_cursor(&PageAllocator::new());
}

#[test]
fn growing_allocator_satisfies_contract() {
    check_disjoint_and_aligned(&GrowingAllocator::new(8));
    check_offsets_resolve(&GrowingAllocator::new(8));
    check_used_tracks_cursor(&GrowingAllocator::with_config(ArenaConfig::default()));
}

#[test]
fn page_allocator_fails_where_growing_allocator_grows() {
    let page = PageAllocator::new();
    let growing = GrowingAllocator::new(8);
    for _ in 0..PAGE_SIZE / 1024 {
        page.alloc(1024, 8).unwrap();
        growing.alloc(1024, 8).unwrap();
    }
    assert!(matches!(
        page.alloc(1024, 8),
        Err(ArenaError::MemoryExhausted { requested: 1024, available: 0 })
    ));
    assert_eq!(growing.alloc(1024, 8).unwrap(), PAGE_SIZE);
}

#[test]
fn reset_allows_reuse_of_the_same_offsets() {
    let mut page = PageAllocator::new();
    let mut growing = GrowingAllocator::new(8);
    let first_page = page.alloc(32, 8).unwrap();
    let first_growing = growing.alloc(32, 8).unwrap();
    page.reset();
    growing.reset();
    assert_eq!(page.alloc(32, 8).unwrap(), first_page);
    assert_eq!(growing.alloc(32, 8).unwrap(), first_growing);
}
