//! Latent codec
//!
//! Moves images between pixel space and the 4-channel latent space through
//! the external VAE encoder/decoder, and converts between value ranges.
//!
//! Pixel tensors are `[batch, height, width, 3]`; latents are
//! `[batch, height / 8, width / 8, 4]`.

use burn::prelude::*;
use burn_ldm_core::ModelError;
use thiserror::Error;

/// Latent channel count
pub const LATENT_CHANNELS: usize = 4;

/// Spatial downscale between pixel and latent space
pub const LATENT_SCALE: usize = 8;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("VAE encoder failed: {0}")]
    Encode(#[source] ModelError),

    #[error("VAE decoder failed: {0}")]
    Decode(#[source] ModelError),

    #[error("Could not read tensor data: {0}")]
    Data(String),

    #[error("Shape mismatch: {0}")]
    Shape(String),

    #[error("Value out of range: {0}")]
    Range(String),
}

/// VAE encoder collaborator: `[-1, 1]` pixels to latents
pub trait ImageEncoder<B: Backend>: Send + Sync {
    fn encode(&self, pixels: Tensor<B, 4>) -> Result<Tensor<B, 4>, ModelError>;
}

/// VAE decoder collaborator: latents to `[-1, 1]` pixels
pub trait ImageDecoder<B: Backend>: Send + Sync {
    fn decode(&self, latent: Tensor<B, 4>) -> Result<Tensor<B, 4>, ModelError>;
}

/// Decoded RGB8 images, row-major HWC per image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBatch {
    pub batch: usize,
    pub height: usize,
    pub width: usize,
    pub data: Vec<u8>,
}

impl ImageBatch {
    /// Bytes of one image
    pub fn image_len(&self) -> usize {
        self.height * self.width * 3
    }

    /// RGB bytes of the image at `index`
    pub fn image(&self, index: usize) -> Option<&[u8]> {
        let len = self.image_len();
        self.data.get(index * len..(index + 1) * len)
    }

    /// Iterate over the RGB bytes of each image
    pub fn images(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.image_len().max(1))
    }
}

/// Convert `[0, 255]` pixels to the `[-1, 1]` range the encoder takes
pub fn pixel_to_unit_range<B: Backend>(image: Tensor<B, 4>) -> Tensor<B, 4> {
    image.div_scalar(255.0).mul_scalar(2.0).sub_scalar(1.0)
}

/// Convert `[-1, 1]` values back to `[0, 255]` (unclamped)
pub fn unit_to_pixel_range<B: Backend>(image: Tensor<B, 4>) -> Tensor<B, 4> {
    unit_to_zero_one(image).mul_scalar(255.0)
}

/// Convert `[-1, 1]` values to `[0, 1]` (unclamped)
pub fn unit_to_zero_one<B: Backend>(image: Tensor<B, 4>) -> Tensor<B, 4> {
    image.add_scalar(1.0).div_scalar(2.0)
}

/// Convert a `[batch, H, W, 3]` tensor of `[0, 255]` values to RGB8
///
/// Values are clamped to `[0, 255]` then truncated.
pub fn tensor_to_rgb<B: Backend>(tensor: Tensor<B, 4>) -> Result<ImageBatch, CodecError> {
    let [batch, height, width, channels] = tensor.dims();
    if channels != 3 {
        return Err(CodecError::Shape(format!(
            "expected 3 image channels, got {}",
            channels
        )));
    }

    let floats: Vec<f32> = tensor
        .clamp(0.0, 255.0)
        .into_data()
        .convert::<f32>()
        .to_vec()
        .map_err(|e| CodecError::Data(format!("{:?}", e)))?;

    Ok(ImageBatch {
        batch,
        height,
        width,
        data: floats.into_iter().map(|v| v as u8).collect(),
    })
}

/// VAE wrapper around the encoder and decoder collaborators
pub struct LatentCodec<B: Backend> {
    encoder: Box<dyn ImageEncoder<B>>,
    decoder: Box<dyn ImageDecoder<B>>,
}

impl<B: Backend> LatentCodec<B> {
    pub fn new(encoder: Box<dyn ImageEncoder<B>>, decoder: Box<dyn ImageDecoder<B>>) -> Self {
        Self { encoder, decoder }
    }

    /// Encode `[-1, 1]` pixels `[batch, H, W, 3]` to latents `[batch, H/8, W/8, 4]`
    pub fn encode(&self, pixels: Tensor<B, 4>) -> Result<Tensor<B, 4>, CodecError> {
        self.encoder.encode(pixels).map_err(CodecError::Encode)
    }

    /// Decode latents to raw `[-1, 1]` pixels
    pub fn decode_raw(&self, latent: Tensor<B, 4>) -> Result<Tensor<B, 4>, CodecError> {
        self.decoder.decode(latent).map_err(CodecError::Decode)
    }

    /// Decode latents to `[0, 1]` pixels (unclamped)
    pub fn decode_unit(&self, latent: Tensor<B, 4>) -> Result<Tensor<B, 4>, CodecError> {
        Ok(unit_to_zero_one(self.decode_raw(latent)?))
    }

    /// Decode latents to RGB8: `clamp(((x + 1) / 2) * 255, 0, 255)`
    pub fn decode(&self, latent: Tensor<B, 4>) -> Result<ImageBatch, CodecError> {
        tensor_to_rgb(unit_to_pixel_range(self.decode_raw(latent)?))
    }
}
