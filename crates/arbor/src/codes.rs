//! Cosmetic digit codes for layers that hide real identifiers.
//!
//! Codes come from a seeded [`StdRng`], so a given seed always reproduces
//! the same diagram.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generator of fixed-width decimal codes such as `"04217"`.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    rng: StdRng,
    digits: usize,
}

impl CodeGenerator {
    pub fn new(seed: u64, digits: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            digits,
        }
    }

    /// Draws the next code.
    pub fn next_code(&mut self) -> String {
        (0..self.digits)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10u8)))
            .collect()
    }
}
