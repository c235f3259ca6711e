//! DDIM (Denoising Diffusion Implicit Models) Sampler
//!
//! Implements the deterministic (eta = 0) update. The step itself is a pure
//! function of its inputs; [`DdimSampler`] only pairs it with a schedule.

use burn::prelude::*;

use crate::scheduler::{StepAlphas, TimestepSchedule, alphas_for};

/// Result of one DDIM step
#[derive(Debug, Clone)]
pub struct DdimOutput<B: Backend> {
    /// Latent at the next-cleaner noise level
    pub prev_sample: Tensor<B, 4>,
    /// Estimate of the fully denoised latent
    pub pred_original: Tensor<B, 4>,
}

/// Perform one deterministic DDIM step
///
/// ```text
/// pred_x0 = (x_t - sqrt(1 - alpha_t) * eps) / sqrt(alpha_t)
/// x_prev  = sqrt(alpha_prev) * pred_x0 + sqrt(1 - alpha_prev) * eps
/// ```
///
/// Alphas must lie in (0, 1]; that is not checked, and NaN/Inf from the noise
/// estimate propagate into the output.
pub fn ddim_step<B: Backend>(
    latent: Tensor<B, 4>,
    noise_pred: Tensor<B, 4>,
    alpha_t: f64,
    alpha_prev: f64,
) -> DdimOutput<B> {
    let sqrt_one_minus_alpha_t = (1.0 - alpha_t).sqrt();
    let pred_original =
        (latent - noise_pred.clone().mul_scalar(sqrt_one_minus_alpha_t)).div_scalar(alpha_t.sqrt());

    // sigma = 0, so the direction term takes the full 1 - alpha_prev variance
    let dir_xt = noise_pred.mul_scalar((1.0 - alpha_prev).sqrt());
    let prev_sample = pred_original.clone().mul_scalar(alpha_prev.sqrt()) + dir_xt;

    DdimOutput {
        prev_sample,
        pred_original,
    }
}

/// DDIM Sampler
///
/// Immutable pairing of a timestep schedule with its step alphas.
#[derive(Debug, Clone)]
pub struct DdimSampler {
    schedule: TimestepSchedule,
    alphas: StepAlphas,
}

impl DdimSampler {
    /// Create a sampler over a schedule
    pub fn new(schedule: TimestepSchedule) -> Self {
        let alphas = alphas_for(&schedule);
        Self { schedule, alphas }
    }

    /// Get the schedule this sampler walks
    pub fn schedule(&self) -> &TimestepSchedule {
        &self.schedule
    }

    /// Get the per-index alpha pairs
    pub fn alphas(&self) -> &StepAlphas {
        &self.alphas
    }

    /// Get the number of inference steps
    pub fn num_steps(&self) -> usize {
        self.schedule.len()
    }

    /// Schedule indices of a run that executes the prefix `[0, end)`
    ///
    /// Yields `end - 1, ..., 0`: noisiest remaining step first.
    pub fn steps_from(&self, end: usize) -> impl Iterator<Item = usize> {
        (0..end.min(self.num_steps())).rev()
    }

    /// Perform one DDIM step at a schedule index
    ///
    /// # Arguments
    /// * `latent` - Current noisy latent
    /// * `noise_pred` - Guided noise estimate for this step
    /// * `index` - Schedule index (0 = least noisy)
    pub fn step<B: Backend>(
        &self,
        latent: Tensor<B, 4>,
        noise_pred: Tensor<B, 4>,
        index: usize,
    ) -> DdimOutput<B> {
        let (alpha_t, alpha_prev) = self.alphas.pair(index);
        ddim_step(latent, noise_pred, alpha_t, alpha_prev)
    }
}
