//! Growing-arena configuration.

use tarn_core::MAX_ALIGN;

use crate::bump::words_for;
use crate::page::PAGE_SIZE;

/// Configuration for a [`GrowingAllocator`](crate::GrowingAllocator).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Initial buffer capacity in bytes.
    ///
    /// Default: one page (4096 bytes). Must be at least
    /// [`MIN_CAPACITY`](Self::MIN_CAPACITY); rounded up to whole 8-byte words.
    pub initial_capacity: usize,
}

impl ArenaConfig {
    /// Default initial capacity: one page.
    pub const DEFAULT_INITIAL_CAPACITY: usize = PAGE_SIZE;

    /// Smallest accepted initial capacity: one alignment unit.
    pub const MIN_CAPACITY: usize = MAX_ALIGN;

    /// Create a config with the given initial capacity in bytes.
    pub fn new(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }

    /// Check the configuration.
    ///
    /// # Panics
    ///
    /// Panics if `initial_capacity < MIN_CAPACITY`. An arena smaller than one
    /// alignment unit cannot hold a single aligned word.
    pub fn validate(&self) {
        assert!(
            self.initial_capacity >= Self::MIN_CAPACITY,
            "growing arena initial capacity must be at least {} bytes, got {}",
            Self::MIN_CAPACITY,
            self.initial_capacity
        );
    }

    /// Initial capacity expressed in 8-byte words.
    pub fn initial_words(&self) -> usize {
        words_for(self.initial_capacity)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_page() {
        let config = ArenaConfig::default();
        assert_eq!(config.initial_capacity, 4096);
        assert_eq!(config.initial_words(), 512);
    }

    #[test]
    fn capacity_rounds_up_to_words() {
        assert_eq!(ArenaConfig::new(9).initial_words(), 2);
    }

    #[test]
    fn minimum_capacity_validates() {
        ArenaConfig::new(8).validate();
    }

    #[test]
    #[should_panic(expected = "at least 8 bytes")]
    fn undersized_capacity_panics() {
        ArenaConfig::new(7).validate();
    }
}
