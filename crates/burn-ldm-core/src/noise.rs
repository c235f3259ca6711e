//! Seeded noise generation
//!
//! Burn's `Tensor::random` draws from the backend's global generator, so two
//! concurrent generations would interleave their draws. Every noise tensor here
//! comes from a [`NoiseGenerator`] owned by a single call instead.

use burn::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Per-call source of standard-normal noise
pub struct NoiseGenerator {
    seed: u64,
    rng: ChaCha8Rng,
}

impl NoiseGenerator {
    /// Create a generator with a fixed seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a generator from an optional seed, drawing a fresh one if absent
    ///
    /// The drawn seed is available through [`NoiseGenerator::seed`] so a run
    /// can be reproduced later.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::from_seed(seed.unwrap_or_else(rand::random))
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw `count` standard-normal samples
    pub fn sample_normal(&mut self, count: usize) -> Vec<f32> {
        (0..count).map(|_| self.rng.sample(StandardNormal)).collect()
    }

    /// Draw a standard-normal tensor of the given shape
    pub fn randn<B: Backend, const D: usize>(
        &mut self,
        shape: [usize; D],
        device: &B::Device,
    ) -> Tensor<B, D> {
        let count = shape.iter().product();
        let values = self.sample_normal(count);
        Tensor::from_data(TensorData::new(values, shape), device)
    }

    /// Draw a standard-normal tensor with the shape and device of `tensor`
    pub fn randn_like<B: Backend, const D: usize>(
        &mut self,
        tensor: &Tensor<B, D>,
    ) -> Tensor<B, D> {
        self.randn(tensor.dims(), &tensor.device())
    }
}

impl std::fmt::Debug for NoiseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseGenerator")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
