//! VAE latent codec and mask compositing
//!
//! The encoder and decoder networks are external collaborators behind
//! [`ImageEncoder`] and [`ImageDecoder`].

pub mod codec;
pub mod compositor;

pub use codec::{
    CodecError, ImageBatch, ImageDecoder, ImageEncoder, LATENT_CHANNELS, LATENT_SCALE,
    LatentCodec, pixel_to_unit_range, tensor_to_rgb, unit_to_pixel_range, unit_to_zero_one,
};
pub use compositor::{
    auto_mask, blend, check_mask_range, check_mask_shape, effective_mask, mask_from_pixels,
};
