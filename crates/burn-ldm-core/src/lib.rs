//! Shared building blocks for latent diffusion sampling
//!
//! - [`noise`] - seeded Gaussian noise, threaded explicitly through each call
//! - [`stats`] - tensor statistics for trace-level diagnostics
//! - [`error`] - the error type collaborator models report failures with

pub mod error;
pub mod noise;
pub mod stats;

pub use error::ModelError;
pub use noise::NoiseGenerator;
pub use stats::{has_non_finite, tensor_stats};
