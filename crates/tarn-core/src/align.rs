//! Alignment arithmetic shared by every allocator.

/// Largest alignment an arena can honour, in bytes.
///
/// Arena buffers are built from 8-byte words, so every offset that is a
/// multiple of an alignment `<= MAX_ALIGN` is also a correctly aligned
/// address. This is also the arena's alignment unit.
pub const MAX_ALIGN: usize = 8;

/// Round `index` up to the next multiple of `alignment`.
///
/// Returns `None` if the result does not fit in a `usize`.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two.
#[inline]
pub fn align_up(index: usize, alignment: usize) -> Option<usize> {
    assert!(
        alignment.is_power_of_two(),
        "alignment must be a power of two, got {alignment}"
    );
    let mask = alignment - 1;
    index.checked_add(mask).map(|v| v & !mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_index_is_unchanged() {
        assert_eq!(align_up(0, 8), Some(0));
        assert_eq!(align_up(16, 8), Some(16));
        assert_eq!(align_up(7, 1), Some(7));
    }

    #[test]
    fn unaligned_index_rounds_up() {
        assert_eq!(align_up(1, 8), Some(8));
        assert_eq!(align_up(9, 4), Some(12));
        assert_eq!(align_up(3, 2), Some(4));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(align_up(usize::MAX, 8), None);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn non_power_of_two_panics() {
        let _ = align_up(3, 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn result_is_smallest_aligned_value_at_or_after_index(
                index in 0usize..1 << 20,
                shift in 0u32..4,
            ) {
                let alignment = 1usize << shift;
                let aligned = align_up(index, alignment).unwrap();
                prop_assert_eq!(aligned % alignment, 0);
                prop_assert!(aligned >= index);
                prop_assert!(aligned - index < alignment);
            }
        }
    }
}
