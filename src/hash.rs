//! Deterministic hashing utilities
//!
//! The mock API and price stream draw their "random" numbers from blake3
//! hashes of a seed and a counter, so every run of a test sees the same
//! prices and failures.

// =============================================================================
// StableHasher - Builder Pattern
// =============================================================================

/// A deterministic hasher using blake3
///
/// Unlike `std::hash::Hasher`, this produces the same output across
/// process restarts for the same input.
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Update with a string
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update(s.as_bytes())
    }

    /// Update with a u64 value (little-endian)
    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Finish and return the hash as u64
    ///
    /// Takes the first 8 bytes of blake3 output as little-endian u64.
    #[inline]
    pub fn finish(self) -> u64 {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Finish and map the hash onto `[0, 1)`
    #[inline]
    pub fn finish_unit(self) -> f64 {
        // Top 53 bits fill an f64 mantissa exactly
        (self.finish() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = StableHasher::new().update_str("price").update_u64(3).finish();
        let b = StableHasher::new().update_str("price").update_u64(3).finish();
        let c = StableHasher::new().update_str("price").update_u64(4).finish();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unit_range() {
        for i in 0..256 {
            let x = StableHasher::new().update_u64(i).finish_unit();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
