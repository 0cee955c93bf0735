//! State Fingerprinting for Replay Verification
//!
//! Provides deterministic hashing of emitted state snapshots for:
//! - Determinism audits (two engines, same seed + inputs, same hashes)
//! - Daily-challenge reproducibility checks in CI and the demo binary

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state snapshots.
///
/// Wraps SHA-256 with helpers for the scalar types that appear in
/// snapshots. Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for engine state snapshots.
    pub fn for_snapshot() -> Self {
        Self::new(b"MINDFORGE_STATE_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f64 value (IEEE-754 bit pattern, little-endian).
    #[inline]
    pub fn update_f64(&mut self, value: f64) {
        self.hasher.update(value.to_bits().to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed string.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Chain two hashes into one (for folding a snapshot sequence).
pub fn chain_hashes(acc: &StateHash, next: &StateHash) -> StateHash {
    let mut hasher = Sha256::new();
    hasher.update(acc);
    hasher.update(next);
    hasher.finalize().into()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_snapshot();
            hasher.update_u32(100);
            hasher.update_u64(12345);
            hasher.update_f64(0.75);
            hasher.update_str("grid-deduction");
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let mut a = StateHasher::new(b"DOMAIN_A");
        let mut b = StateHasher::new(b"DOMAIN_B");
        a.update_u32(7);
        b.update_u32(7);
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_str_length_prefix_disambiguates() {
        // "ab" + "c" must not collide with "a" + "bc"
        let mut h1 = StateHasher::new(b"t");
        h1.update_str("ab");
        h1.update_str("c");

        let mut h2 = StateHasher::new(b"t");
        h2.update_str("a");
        h2.update_str("bc");

        assert_ne!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_chain_hashes() {
        let a = [1u8; 32];
        let b = [2u8; 32];

        assert_eq!(chain_hashes(&a, &b), chain_hashes(&a, &b));
        assert_ne!(chain_hashes(&a, &b), chain_hashes(&b, &a));
    }
}
