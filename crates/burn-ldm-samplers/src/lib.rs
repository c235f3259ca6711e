//! Deterministic DDIM sampling for latent diffusion
//!
//! - [`alphas`] - the constant cumulative alpha table
//! - [`scheduler`] - timestep schedule, step alphas, noise injection
//! - [`guidance`] - classifier-free guidance
//! - [`ddim`] - the deterministic denoising step

pub mod alphas;
pub mod ddim;
pub mod guidance;
pub mod scheduler;

pub use alphas::{ALPHAS_CUMPROD, NUM_TRAIN_TIMESTEPS};
pub use ddim::{DdimOutput, DdimSampler, ddim_step};
pub use guidance::apply_guidance;
pub use scheduler::{
    ScheduleError, StepAlphas, TimestepSchedule, add_noise, alpha_cumprod_at, alphas_for,
    build_schedule, default_schedule, mix_noise, strength_index,
};
