//! Deterministic pseudo-random numbers for reproducible training runs.
//!
//! A plain LCG keeps the train/held-out split and the forest bootstrap
//! reproducible across platforms without external dependencies.

/// Linear congruential generator with fixed multiplier and increment.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Seeded generator; equal seeds yield equal sequences.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance and return the raw 64-bit state.
    pub fn next_u64(&mut self) -> u64 {
        // LCG: state = state * 6364136223846793005 + 1442695040888963407
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform draw in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `[0, bound)`. `bound` must be nonzero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// Fisher-Yates shuffle driven by this generator.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}
