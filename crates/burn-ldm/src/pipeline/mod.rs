//! Stable Diffusion pipeline
//!
//! [`StableDiffusion`] holds the model collaborators and nothing else; every
//! generation takes its parameters as an immutable config value and owns its
//! own seeded noise generator, so calls never share mutable state.

mod context;
mod diffuse;
mod modes;

use burn::prelude::*;
use burn_ldm_clip::{TextEncoder, Tokenizer};
use burn_ldm_core::NoiseGenerator;
use burn_ldm_unet::DenoisingModel;
use burn_ldm_vae::{ImageDecoder, ImageEncoder, LATENT_CHANNELS, LATENT_SCALE, LatentCodec};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Configuration for text-to-image sampling
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Output width in pixels, a multiple of 8
    pub width: usize,
    /// Output height in pixels, a multiple of 8
    pub height: usize,
    pub steps: usize,
    pub guidance_scale: f64,
    pub batch_size: usize,
    /// Noise seed; a fresh one is drawn and logged when absent
    pub seed: Option<u64>,
    /// Multiplier on the strength used to pick the starting step
    pub temperature: f64,
    /// Show a progress bar over the denoising steps
    pub progress: bool,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            steps: 25,
            guidance_scale: 7.5,
            batch_size: 1,
            seed: None,
            temperature: 1.0,
            progress: false,
        }
    }
}

/// Configuration for img2img sampling
///
/// The output takes the size of the input image; `sample.width` and
/// `sample.height` are not used.
#[derive(Debug, Clone)]
pub struct Img2ImgConfig {
    pub sample: SampleConfig,
    /// Strength of the transformation (0.0 = no change, 1.0 = full regeneration)
    pub strength: f64,
}

impl Default for Img2ImgConfig {
    fn default() -> Self {
        Self {
            sample: SampleConfig::default(),
            strength: 0.5,
        }
    }
}

/// Inpainting configuration
#[derive(Debug, Clone)]
pub struct InpaintConfig {
    pub sample: SampleConfig,
    pub strength: f64,
    /// Re-encode a masked blend of the current and original image every step
    ///
    /// The blend keeps the original where the mask is 1, the same polarity as
    /// the final composite.
    pub feedback: bool,
    /// Tighten the mask with one derived from the brightness of the output
    pub auto_mask: bool,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            sample: SampleConfig::default(),
            strength: 0.5,
            feedback: false,
            auto_mask: false,
        }
    }
}

/// Schedule parameters for [`StableDiffusion::diffuse`]
#[derive(Debug, Clone)]
pub struct DiffuseConfig {
    pub steps: usize,
    pub guidance_scale: f64,
    /// Run only the steps below the strength index, as img2img does
    pub strength: Option<f64>,
    pub temperature: f64,
    pub progress: bool,
}

impl Default for DiffuseConfig {
    fn default() -> Self {
        Self {
            steps: 25,
            guidance_scale: 7.5,
            strength: None,
            temperature: 1.0,
            progress: false,
        }
    }
}

/// What to output at each sampling step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepOutput {
    /// No output, minimal overhead
    #[default]
    None,
    /// Raw latent tensor
    Latent,
    /// Full VAE decode to `[0, 255]` pixels (expensive)
    Decoded,
}

/// Information passed to step callback
pub struct StepInfo<B: Backend> {
    /// Executed step (0-indexed)
    pub step: usize,
    /// Schedule index of this step
    pub index: usize,
    /// Current timestep value
    pub timestep: usize,
    /// Number of steps this call executes
    pub total_steps: usize,
    /// Output based on StepOutput setting
    pub output: Option<Tensor<B, 4>>,
}

/// Conditional and unconditional text contexts, `[batch, 77, 768]` each
#[derive(Debug, Clone)]
pub struct Conditioning<B: Backend> {
    pub cond: Tensor<B, 3>,
    pub uncond: Tensor<B, 3>,
}

impl<B: Backend> Conditioning<B> {
    pub fn batch_size(&self) -> usize {
        self.cond.dims()[0]
    }

    /// Repeat a single-row conditioning over `batch_size` rows
    pub fn expand_to(&self, batch_size: usize) -> Result<Self> {
        let have = self.batch_size();
        if have == batch_size {
            return Ok(self.clone());
        }
        if have != 1 {
            return Err(PipelineError::Validation(format!(
                "conditioning batch {} does not match latent batch {}",
                have, batch_size
            )));
        }
        Ok(Self {
            cond: self.cond.clone().repeat_dim(0, batch_size),
            uncond: self.uncond.clone().repeat_dim(0, batch_size),
        })
    }
}

/// Stable Diffusion 1.x sampling pipeline
pub struct StableDiffusion<B: Backend> {
    tokenizer: Box<dyn Tokenizer>,
    text_encoder: Box<dyn TextEncoder<B>>,
    unet: Box<dyn DenoisingModel<B>>,
    codec: LatentCodec<B>,
    device: B::Device,
}

impl<B: Backend> StableDiffusion<B> {
    /// Create a pipeline from its model collaborators
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        text_encoder: Box<dyn TextEncoder<B>>,
        unet: Box<dyn DenoisingModel<B>>,
        vae_encoder: Box<dyn ImageEncoder<B>>,
        vae_decoder: Box<dyn ImageDecoder<B>>,
        device: &B::Device,
    ) -> Self {
        Self {
            tokenizer,
            text_encoder,
            unet,
            codec: LatentCodec::new(vae_encoder, vae_decoder),
            device: device.clone(),
        }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Draw `[batch, height / 8, width / 8, 4]` standard-normal noise
    pub fn noise_latent(
        &self,
        batch_size: usize,
        width: usize,
        height: usize,
        seed: Option<u64>,
    ) -> Result<Tensor<B, 4>> {
        let dims = latent_dims(batch_size, width, height)?;
        Ok(noise_generator(seed).randn(dims, &self.device))
    }
}

/// Latent shape for a batch of `width` x `height` images
pub(crate) fn latent_dims(batch_size: usize, width: usize, height: usize) -> Result<[usize; 4]> {
    if batch_size == 0 {
        return Err(PipelineError::InvalidConfig(
            "batch size must be positive".to_string(),
        ));
    }
    check_image_size(width, height).map_err(PipelineError::InvalidConfig)?;
    Ok([
        batch_size,
        height / LATENT_SCALE,
        width / LATENT_SCALE,
        LATENT_CHANNELS,
    ])
}

pub(crate) fn check_image_size(width: usize, height: usize) -> std::result::Result<(), String> {
    if width == 0 || height == 0 || width % LATENT_SCALE != 0 || height % LATENT_SCALE != 0 {
        return Err(format!(
            "image size {}x{} must be a positive multiple of {}",
            width, height, LATENT_SCALE
        ));
    }
    Ok(())
}

pub(crate) fn check_strength(strength: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&strength) {
        return Err(PipelineError::InvalidConfig(format!(
            "strength {} is outside [0, 1]",
            strength
        )));
    }
    Ok(())
}

/// Per-call generator; unseeded calls log the seed they drew
pub(crate) fn noise_generator(seed: Option<u64>) -> NoiseGenerator {
    let rng = NoiseGenerator::from_optional_seed(seed);
    if seed.is_none() {
        info!(seed = rng.seed(), "Using random seed");
    } else {
        debug!(seed = rng.seed(), "Using seed");
    }
    rng
}
