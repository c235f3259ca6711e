//! burn-ldm: Stable Diffusion sampling in pure Rust with Burn
//!
//! The text encoder, denoising network and VAE are supplied by the caller as
//! trait objects; this crate owns the reverse-diffusion loop around them.
//!
//! # Example
//!
//! ```ignore
//! use burn_ldm::{SampleConfig, StableDiffusion};
//! use burn_ldm::backends::{DefaultBackend, default_device};
//!
//! let device = default_device();
//! let pipeline = StableDiffusion::<DefaultBackend>::new(
//!     tokenizer, text_encoder, unet, vae_encoder, vae_decoder, &device,
//! );
//! let images = pipeline.text_to_image("a red apple", None, &SampleConfig::default())?;
//! ```

pub mod backends;
pub mod error;
pub mod pipeline;

pub use error::{PipelineError, Result, Stage};
pub use pipeline::{
    Conditioning, DiffuseConfig, Img2ImgConfig, InpaintConfig, SampleConfig, StableDiffusion,
    StepInfo, StepOutput,
};

pub use burn_ldm_clip::{TextEncoder, Tokenizer};
pub use burn_ldm_core::{ModelError, NoiseGenerator};
pub use burn_ldm_unet::DenoisingModel;
pub use burn_ldm_vae::{ImageBatch, ImageDecoder, ImageEncoder};
