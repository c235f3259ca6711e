//! Denoising network contract
//!
//! The UNet itself is an external collaborator. This crate defines how it is
//! called and builds the sinusoidal timestep embedding it is conditioned on.

pub mod embedding;
pub mod model;

pub use embedding::{DEFAULT_MAX_PERIOD, TIME_EMBED_DIM, timestep_embedding};
pub use model::DenoisingModel;
