//! UNet collaborator

use burn::prelude::*;
use burn_ldm_core::ModelError;

/// Noise-predicting denoising network
///
/// # Arguments
/// * `latent` - Noisy latent `[batch, h, w, 4]`
/// * `time_embedding` - Sinusoidal timestep embedding `[batch, 320]`
/// * `context` - Text context `[batch, 77, 768]`
///
/// Returns the predicted noise, shaped like `latent`. The conditional and
/// unconditional branches of a step may call it from two threads at once.
pub trait DenoisingModel<B: Backend>: Send + Sync {
    fn forward(
        &self,
        latent: Tensor<B, 4>,
        time_embedding: Tensor<B, 2>,
        context: Tensor<B, 3>,
    ) -> Result<Tensor<B, 4>, ModelError>;
}
