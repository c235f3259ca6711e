//! Classifier-Free Guidance

use burn::prelude::*;

/// Apply classifier-free guidance
///
/// Combines conditional and unconditional predictions:
/// `output = uncond + guidance_scale * (cond - uncond)`
///
/// A scale of exactly 1.0 returns `noise_pred_cond` and 0.0 returns
/// `noise_pred_uncond` untouched, so neither picks up rounding from the
/// subtraction. Negative scales and scales above 1 extrapolate.
pub fn apply_guidance<B: Backend, const D: usize>(
    noise_pred_uncond: Tensor<B, D>,
    noise_pred_cond: Tensor<B, D>,
    guidance_scale: f64,
) -> Tensor<B, D> {
    if guidance_scale == 1.0 {
        return noise_pred_cond;
    }
    if guidance_scale == 0.0 {
        return noise_pred_uncond;
    }
    noise_pred_uncond.clone() + (noise_pred_cond - noise_pred_uncond).mul_scalar(guidance_scale)
}
