//! Reverse-diffusion loop

use burn::prelude::*;
use burn_ldm_core::{NoiseGenerator, has_non_finite, tensor_stats};
use burn_ldm_samplers::{DdimSampler, add_noise, apply_guidance, default_schedule, strength_index};
use burn_ldm_unet::{DEFAULT_MAX_PERIOD, TIME_EMBED_DIM, timestep_embedding};
use burn_ldm_vae::{ImageBatch, auto_mask, blend, effective_mask, tensor_to_rgb};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Level, debug, info_span, trace, warn};

use super::{Conditioning, DiffuseConfig, StableDiffusion, StepInfo, StepOutput, check_strength};
use crate::error::{PipelineError, Result, Stage};

/// Per-call loop parameters
pub(crate) struct LoopPlan {
    /// Length of the executed schedule prefix
    pub end: usize,
    pub guidance_scale: f64,
    pub progress: bool,
    pub step_output: StepOutput,
}

/// Source image an inpainting run composites against
pub(crate) struct Inpainting<B: Backend> {
    /// Clean encoded image, batch-expanded
    pub latent: Tensor<B, 4>,
    /// Source pixels in `[0, 255]`
    pub pixels: Tensor<B, 4>,
    /// User mask in `[0, 1]`, 1 keeps the source pixel
    pub mask: Tensor<B, 4>,
    pub feedback: bool,
    pub auto_mask: bool,
    /// Noise for re-noising the source latent in feedback mode
    pub rng: NoiseGenerator,
}

impl<B: Backend> StableDiffusion<B> {
    /// Run the denoising loop over an externally prepared latent
    ///
    /// With `strength` set, only the schedule prefix below the strength index
    /// runs, matching a latent noised by [`StableDiffusion::add_noise_latent`].
    pub fn diffuse(
        &self,
        latent: Tensor<B, 4>,
        conditioning: &Conditioning<B>,
        config: &DiffuseConfig,
    ) -> Result<ImageBatch> {
        self.diffuse_with_callback(latent, conditioning, config, StepOutput::None, |_| {})
    }

    /// [`StableDiffusion::diffuse`] with a per-step callback
    pub fn diffuse_with_callback<F>(
        &self,
        latent: Tensor<B, 4>,
        conditioning: &Conditioning<B>,
        config: &DiffuseConfig,
        step_output: StepOutput,
        mut callback: F,
    ) -> Result<ImageBatch>
    where
        F: FnMut(StepInfo<B>),
    {
        let span = info_span!("generate", mode = "diffuse");
        let _enter = span.enter();

        super::modes::check_latent(&latent)?;
        if let Some(strength) = config.strength {
            check_strength(strength)?;
        }
        let sampler = DdimSampler::new(default_schedule(config.steps)?);
        let end = match config.strength {
            Some(strength) => strength_index(sampler.schedule(), strength, config.temperature),
            None => sampler.num_steps(),
        };
        let conditioning = conditioning.expand_to(latent.dims()[0])?;

        let plan = LoopPlan {
            end,
            guidance_scale: config.guidance_scale,
            progress: config.progress,
            step_output,
        };
        let latent = self.denoise(latent, &conditioning, &sampler, &plan, None, &mut callback)?;
        self.finish(latent, None)
    }

    /// Walk the schedule prefix `[0, plan.end)` from its noisiest step down
    pub(crate) fn denoise<F>(
        &self,
        mut latent: Tensor<B, 4>,
        conditioning: &Conditioning<B>,
        sampler: &DdimSampler,
        plan: &LoopPlan,
        mut inpainting: Option<&mut Inpainting<B>>,
        callback: &mut F,
    ) -> Result<Tensor<B, 4>>
    where
        F: FnMut(StepInfo<B>),
    {
        let executed = sampler.schedule().truncated(plan.end);
        let timesteps = executed.timesteps();
        let indices: Vec<usize> = sampler.steps_from(executed.len()).collect();
        let total_steps = indices.len();
        debug!(
            steps = sampler.num_steps(),
            executed = total_steps,
            guidance_scale = plan.guidance_scale,
            "Denoising"
        );
        if tracing::enabled!(Level::TRACE) {
            trace!(latent = %tensor_stats(&latent), "Initial latent");
        }

        let bar = progress_bar(total_steps, plan.progress);

        for (step, index) in indices.into_iter().enumerate() {
            let timestep = timesteps[index];

            let noise_pred =
                self.guided_noise(&latent, timestep, conditioning, plan.guidance_scale)?;
            latent = sampler.step(latent, noise_pred, index).prev_sample;

            if tracing::enabled!(Level::TRACE) {
                trace!(step, index, timestep, latent = %tensor_stats(&latent), "Step");
            }

            // Feedback shapes the latent entering the next step, so the last step skips it
            if let Some(inpainting) = inpainting.as_deref_mut() {
                if inpainting.feedback && index > 0 {
                    latent = self.feedback(latent, inpainting, timestep)?;
                }
            }

            let output = match plan.step_output {
                StepOutput::None => None,
                StepOutput::Latent => Some(latent.clone()),
                StepOutput::Decoded => {
                    Some(self.decode_pixels(latent.clone(), inpainting.as_deref())?)
                }
            };

            callback(StepInfo {
                step,
                index,
                timestep,
                total_steps,
                output,
            });

            if let Some(bar) = &bar {
                bar.set_message(format!("{:3} {:3}", index, timestep));
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        if tracing::enabled!(Level::WARN) && has_non_finite(&latent) {
            warn!("Final latent contains NaN/Inf values");
        }

        Ok(latent)
    }

    /// Classifier-free guided noise estimate for one step
    ///
    /// The unconditional and conditional evaluations run as a fork/join pair.
    fn guided_noise(
        &self,
        latent: &Tensor<B, 4>,
        timestep: usize,
        conditioning: &Conditioning<B>,
        guidance_scale: f64,
    ) -> Result<Tensor<B, 4>> {
        let batch_size = latent.dims()[0];
        let t_emb = timestep_embedding::<B>(
            timestep,
            TIME_EMBED_DIM,
            DEFAULT_MAX_PERIOD,
            batch_size,
            &self.device,
        );
        let unet = self.unet.as_ref();

        let (noise_uncond, noise_cond) = rayon::join(
            || unet.forward(latent.clone(), t_emb.clone(), conditioning.uncond.clone()),
            || unet.forward(latent.clone(), t_emb.clone(), conditioning.cond.clone()),
        );
        let noise_uncond = noise_uncond.map_err(|e| PipelineError::inference(Stage::Denoise, e))?;
        let noise_cond = noise_cond.map_err(|e| PipelineError::inference(Stage::Denoise, e))?;

        Ok(apply_guidance(noise_uncond, noise_cond, guidance_scale))
    }

    /// Replace the latent with a re-encoded blend of itself and the source
    ///
    /// Both sides are decoded to `[-1, 1]` pixels; the source side is the
    /// clean source latent re-noised to `timestep`.
    fn feedback(
        &self,
        latent: Tensor<B, 4>,
        inpainting: &mut Inpainting<B>,
        timestep: usize,
    ) -> Result<Tensor<B, 4>> {
        let noised = add_noise(inpainting.latent.clone(), timestep, None, &mut inpainting.rng);
        let current = self.codec.decode_raw(latent)?;
        let source = self.codec.decode_raw(noised)?;
        let mix = blend(source, current, inpainting.mask.clone())?;
        Ok(self.codec.encode(mix)?)
    }

    /// Decode a latent to clamped `[0, 255]` pixels, composited when inpainting
    pub(crate) fn decode_pixels(
        &self,
        latent: Tensor<B, 4>,
        inpainting: Option<&Inpainting<B>>,
    ) -> Result<Tensor<B, 4>> {
        let decoded = self.codec.decode_unit(latent)?;
        let pixels = decoded.clone().mul_scalar(255.0);

        let pixels = match inpainting {
            Some(inpainting) => {
                let auto = inpainting.auto_mask.then(|| auto_mask(decoded));
                match effective_mask(Some(inpainting.mask.clone()), auto)? {
                    Some(mask) => blend(inpainting.pixels.clone(), pixels, mask)?,
                    None => pixels,
                }
            }
            None => pixels,
        };

        Ok(pixels.clamp(0.0, 255.0))
    }

    /// Final decode to RGB8
    pub(crate) fn finish(
        &self,
        latent: Tensor<B, 4>,
        inpainting: Option<&Inpainting<B>>,
    ) -> Result<ImageBatch> {
        debug!("Decoding latent");
        let pixels = self.decode_pixels(latent, inpainting)?;
        Ok(tensor_to_rgb(pixels)?)
    }
}

fn progress_bar(total_steps: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let bar = ProgressBar::new(total_steps as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    Some(bar)
}
