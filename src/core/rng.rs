//! Deterministic Random Number Generator
//!
//! Uses the Mulberry32 algorithm for fast, high-quality, deterministic
//! randomness. Given the same seed, produces identical sequence on all
//! platforms.

use serde::{Serialize, Deserialize};

/// Deterministic PRNG using the Mulberry32 algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform. Every engine owns exactly one
/// `SeededRng` and consumes it as a single stream; the RNG is never
/// cloned mid-game, since level generation depends on consumption order.
///
/// # Example
///
/// ```
/// use mindforge::core::rng::SeededRng;
///
/// let mut rng = SeededRng::new(42);
/// let value = rng.next_u32();
/// assert_eq!(value, 2581720956); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SeededRng {
    /// Create a new RNG from a 32-bit seed.
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generate the next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate the next value in `[0, 1)`.
    ///
    /// This is the sole entropy source; every derived operation below is
    /// a pure function of this one stream.
    #[inline]
    pub fn next(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Generate a random integer in `[min, max]` (inclusive on both ends).
    #[inline]
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        (self.next() * (max - min + 1) as f64) as i64 + min
    }

    /// Generate a random float in `[min, max)`.
    #[inline]
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Return a shuffled copy of a slice (Fisher-Yates).
    ///
    /// The input is not mutated; one `next()` is consumed per swap.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out: Vec<T> = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = (self.next() * (i + 1) as f64) as usize;
            out.swap(i, j);
        }
        out
    }

    /// Select a random element from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let idx = self.next_int(0, items.len() as i64 - 1) as usize;
            Some(&items[idx])
        }
    }

    /// Select `count` distinct random elements (a shuffled prefix).
    pub fn pick_multiple<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let mut shuffled = self.shuffle(items);
        shuffled.truncate(count.min(items.len()));
        shuffled
    }

    /// Random boolean with the given probability of `true`.
    #[inline]
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next() < probability
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }
}

// =============================================================================
// TESTS
// =============================================================================
