//! Noise schedule for the deterministic sampler
//!
//! Derives the inference timestep subsequence and per-step alpha coefficients
//! from [`ALPHAS_CUMPROD`], and injects noise into clean latents.

use burn::prelude::*;
use burn_ldm_core::NoiseGenerator;
use thiserror::Error;

use crate::alphas::{ALPHAS_CUMPROD, NUM_TRAIN_TIMESTEPS};

/// Schedule construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Step count must be positive")]
    ZeroSteps,

    #[error("Stride {total_steps} / {num_steps} is below 1")]
    StrideTooSmall { num_steps: usize, total_steps: usize },

    #[error("Schedule covers {total_steps} timesteps but the alpha table has {table_len}")]
    TableTooShort { total_steps: usize, table_len: usize },

    #[error("Last timestep {timestep} is not below the {total_steps}-step range")]
    TimestepOutOfRange { timestep: usize, total_steps: usize },
}

/// Strictly increasing inference timesteps, starting at 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestepSchedule {
    timesteps: Vec<usize>,
}

impl TimestepSchedule {
    /// Raw timestep values in increasing order
    pub fn timesteps(&self) -> &[usize] {
        &self.timesteps
    }

    pub fn len(&self) -> usize {
        self.timesteps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timesteps.is_empty()
    }

    /// Timestep at a schedule index
    pub fn get(&self, index: usize) -> Option<usize> {
        self.timesteps.get(index).copied()
    }

    /// Forward prefix `[0, end)` of the schedule
    ///
    /// Image-conditioned runs execute only this prefix, still in reverse order.
    pub fn truncated(&self, end: usize) -> Self {
        Self {
            timesteps: self.timesteps[..end.min(self.len())].to_vec(),
        }
    }
}

/// Alpha pairs consumed by each sampler step
#[derive(Debug, Clone, PartialEq)]
pub struct StepAlphas {
    /// ᾱ at each schedule timestep
    pub alphas: Vec<f64>,
    /// ᾱ of the next-cleaner step: `1.0` for index 0, else `alphas[i - 1]`
    pub alphas_prev: Vec<f64>,
}

impl StepAlphas {
    /// `(alpha_t, alpha_prev)` for a schedule index
    pub fn pair(&self, index: usize) -> (f64, f64) {
        (self.alphas[index], self.alphas_prev[index])
    }

    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }
}

/// Build the inference timesteps `1, 1 + stride, 1 + 2 * stride, ...`
///
/// `stride = total_steps / num_steps`; the result has exactly `num_steps`
/// entries, all below `total_steps`.
pub fn build_schedule(
    num_steps: usize,
    total_steps: usize,
) -> Result<TimestepSchedule, ScheduleError> {
    if num_steps == 0 {
        return Err(ScheduleError::ZeroSteps);
    }
    if total_steps > NUM_TRAIN_TIMESTEPS {
        return Err(ScheduleError::TableTooShort {
            total_steps,
            table_len: NUM_TRAIN_TIMESTEPS,
        });
    }

    let stride = total_steps / num_steps;
    if stride < 1 {
        return Err(ScheduleError::StrideTooSmall {
            num_steps,
            total_steps,
        });
    }

    let timesteps: Vec<usize> = (0..num_steps).map(|i| 1 + i * stride).collect();

    let last = timesteps[num_steps - 1];
    if last >= total_steps {
        return Err(ScheduleError::TimestepOutOfRange {
            timestep: last,
            total_steps,
        });
    }

    Ok(TimestepSchedule { timesteps })
}

/// Build the schedule over the full 1000-step training range
pub fn default_schedule(num_steps: usize) -> Result<TimestepSchedule, ScheduleError> {
    build_schedule(num_steps, NUM_TRAIN_TIMESTEPS)
}

/// Get alpha_cumprod at a raw timestep
pub fn alpha_cumprod_at(timestep: usize) -> f64 {
    ALPHAS_CUMPROD[timestep]
}

/// Look up the alpha pair for every schedule index
pub fn alphas_for(schedule: &TimestepSchedule) -> StepAlphas {
    let alphas: Vec<f64> = schedule.timesteps.iter().map(|&t| alpha_cumprod_at(t)).collect();

    let mut alphas_prev = Vec::with_capacity(alphas.len());
    alphas_prev.push(1.0);
    alphas_prev.extend_from_slice(&alphas[..alphas.len().saturating_sub(1)]);
    alphas_prev.truncate(alphas.len());

    StepAlphas { alphas, alphas_prev }
}

/// Noise a clean latent to the level of a raw timestep
///
/// `sqrt(ᾱ_t) * latent + sqrt(1 - ᾱ_t) * noise`. With an explicit `noise`
/// tensor this is a pure function; otherwise standard-normal noise of the
/// latent's shape is drawn from `rng`.
pub fn add_noise<B: Backend>(
    latent: Tensor<B, 4>,
    timestep: usize,
    noise: Option<Tensor<B, 4>>,
    rng: &mut NoiseGenerator,
) -> Tensor<B, 4> {
    let noise = noise.unwrap_or_else(|| rng.randn_like(&latent));
    mix_noise(latent, noise, timestep)
}

/// Noise a clean latent with a given noise tensor
pub fn mix_noise<B: Backend>(
    latent: Tensor<B, 4>,
    noise: Tensor<B, 4>,
    timestep: usize,
) -> Tensor<B, 4> {
    let alpha = alpha_cumprod_at(timestep);
    let sqrt_alpha = alpha.sqrt();
    let sqrt_one_minus_alpha = (1.0 - alpha).sqrt();

    latent.mul_scalar(sqrt_alpha) + noise.mul_scalar(sqrt_one_minus_alpha)
}

/// Schedule index selected by an img2img strength
///
/// `clamp(floor(len * strength * temperature), 0, len - 1)`. The same index
/// picks the injected-noise timestep and the executed prefix length.
pub fn strength_index(schedule: &TimestepSchedule, strength: f64, temperature: f64) -> usize {
    let last = schedule.len().saturating_sub(1);
    let raw = (schedule.len() as f64 * strength * temperature).floor();

    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(last)
    }
}
