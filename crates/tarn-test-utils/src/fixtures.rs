//! Deterministic inputs shared by tests and benches.

/// `n` distinct decimal keys: `"0"`, `"1"`, ...
pub fn numbered_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

/// `n` distinct keys with a common prefix, so comparisons scan past it.
pub fn prefixed_keys(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i:06}")).collect()
}

/// A byte payload of `len` bytes that cycles through `0..=250`.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct() {
        let keys = prefixed_keys("k", 100);
        let mut sorted = keys.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 100);
        assert_eq!(numbered_keys(3), vec!["0", "1", "2"]);
    }

    #[test]
    fn payload_length() {
        assert_eq!(payload(300).len(), 300);
        assert_eq!(payload(300)[251], 0);
    }
}
