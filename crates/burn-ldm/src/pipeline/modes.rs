//! Generation modes: text-to-image, img2img, inpainting and their building blocks

use burn::prelude::*;
use burn_ldm_core::NoiseGenerator;
use burn_ldm_samplers::{DdimSampler, add_noise, default_schedule, mix_noise, strength_index};
use burn_ldm_vae::{
    ImageBatch, LATENT_CHANNELS, check_mask_range, check_mask_shape, pixel_to_unit_range,
};
use tracing::{debug, info_span};

use super::diffuse::{Inpainting, LoopPlan};
use super::{
    Conditioning, Img2ImgConfig, InpaintConfig, SampleConfig, StableDiffusion, StepInfo,
    StepOutput, check_image_size, check_strength, latent_dims, noise_generator,
};
use crate::error::{PipelineError, Result, Stage};

impl<B: Backend> StableDiffusion<B> {
    /// Generate images from a text prompt
    ///
    /// # Arguments
    /// * `prompt` - Text prompt
    /// * `negative_prompt` - Replaces the empty prompt as the unconditional context
    /// * `config` - Sampling configuration
    pub fn text_to_image(
        &self,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &SampleConfig,
    ) -> Result<ImageBatch> {
        self.text_to_image_with_callback(prompt, negative_prompt, config, StepOutput::None, |_| {})
    }

    /// [`StableDiffusion::text_to_image`] with a per-step callback
    pub fn text_to_image_with_callback<F>(
        &self,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &SampleConfig,
        step_output: StepOutput,
        mut callback: F,
    ) -> Result<ImageBatch>
    where
        F: FnMut(StepInfo<B>),
    {
        let span = info_span!("generate", mode = "txt2img");
        let _enter = span.enter();

        let dims = latent_dims(config.batch_size, config.width, config.height)?;
        let sampler = DdimSampler::new(default_schedule(config.steps)?);
        let conditioning = self.tokenize(prompt, negative_prompt, config.batch_size)?;

        let latent = noise_generator(config.seed).randn(dims, &self.device);
        self.sample_full(latent, &conditioning, &sampler, config, step_output, &mut callback)
    }

    /// Generate images starting from caller-supplied latent noise
    ///
    /// The batch and size follow `noise`; the full schedule runs.
    pub fn generate_from_noise(
        &self,
        noise: Tensor<B, 4>,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &SampleConfig,
    ) -> Result<ImageBatch> {
        let span = info_span!("generate", mode = "noise");
        let _enter = span.enter();

        check_latent(&noise)?;
        let sampler = DdimSampler::new(default_schedule(config.steps)?);
        let conditioning = self.tokenize(prompt, negative_prompt, noise.dims()[0])?;

        self.sample_full(noise, &conditioning, &sampler, config, StepOutput::None, &mut |_| {})
    }

    /// Generate images from previously encoded text contexts
    ///
    /// Draws seeded noise of the configured size when `noise` is `None`.
    pub fn generate_from_context(
        &self,
        conditioning: &Conditioning<B>,
        noise: Option<Tensor<B, 4>>,
        config: &SampleConfig,
    ) -> Result<ImageBatch> {
        let span = info_span!("generate", mode = "context");
        let _enter = span.enter();

        if let Some(noise) = &noise {
            check_latent(noise)?;
        }
        let sampler = DdimSampler::new(default_schedule(config.steps)?);
        let latent = match noise {
            Some(noise) => noise,
            None => {
                let dims = latent_dims(config.batch_size, config.width, config.height)?;
                noise_generator(config.seed).randn(dims, &self.device)
            }
        };
        let conditioning = conditioning.expand_to(latent.dims()[0])?;

        self.sample_full(latent, &conditioning, &sampler, config, StepOutput::None, &mut |_| {})
    }

    /// Transform an image guided by a text prompt
    ///
    /// `image` is `[1 | batch, H, W, 3]` in `[0, 255]`.
    pub fn image_to_image(
        &self,
        image: Tensor<B, 4>,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &Img2ImgConfig,
    ) -> Result<ImageBatch> {
        self.image_to_image_with_callback(
            image,
            prompt,
            negative_prompt,
            config,
            StepOutput::None,
            |_| {},
        )
    }

    /// [`StableDiffusion::image_to_image`] with a per-step callback
    pub fn image_to_image_with_callback<F>(
        &self,
        image: Tensor<B, 4>,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &Img2ImgConfig,
        step_output: StepOutput,
        mut callback: F,
    ) -> Result<ImageBatch>
    where
        F: FnMut(StepInfo<B>),
    {
        let span = info_span!("generate", mode = "img2img");
        let _enter = span.enter();

        let sample = &config.sample;
        let (sampler, end) = image_schedule(image.dims(), sample, config.strength)?;
        let conditioning = self.tokenize(prompt, negative_prompt, sample.batch_size)?;

        let mut rng = noise_generator(sample.seed);
        let init_latent = self.encode_batch(image, sample.batch_size)?;
        let latent = noise_to_start(init_latent, &sampler, end, &mut rng);

        let plan = LoopPlan {
            end,
            guidance_scale: sample.guidance_scale,
            progress: sample.progress,
            step_output,
        };
        let latent = self.denoise(latent, &conditioning, &sampler, &plan, None, &mut callback)?;
        self.finish(latent, None)
    }

    /// Regenerate the unmasked region of an image
    ///
    /// `mask` is `[1 | batch, H, W, 1 | 3]` in `[0, 1]`; 1 keeps the source
    /// pixel and 0 lets the generated pixel through.
    pub fn inpaint(
        &self,
        image: Tensor<B, 4>,
        mask: Tensor<B, 4>,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &InpaintConfig,
    ) -> Result<ImageBatch> {
        self.inpaint_with_callback(
            image,
            mask,
            prompt,
            negative_prompt,
            config,
            StepOutput::None,
            |_| {},
        )
    }

    /// [`StableDiffusion::inpaint`] with a per-step callback
    ///
    /// Decoded step outputs are composited with the source image.
    #[allow(clippy::too_many_arguments)]
    pub fn inpaint_with_callback<F>(
        &self,
        image: Tensor<B, 4>,
        mask: Tensor<B, 4>,
        prompt: &str,
        negative_prompt: Option<&str>,
        config: &InpaintConfig,
        step_output: StepOutput,
        mut callback: F,
    ) -> Result<ImageBatch>
    where
        F: FnMut(StepInfo<B>),
    {
        let span = info_span!("generate", mode = "inpaint");
        let _enter = span.enter();

        let sample = &config.sample;
        check_mask_shape(image.dims(), mask.dims())?;
        check_mask_range(&mask)?;
        let (sampler, end) = image_schedule(image.dims(), sample, config.strength)?;
        let conditioning = self.tokenize(prompt, negative_prompt, sample.batch_size)?;

        let mut rng = noise_generator(sample.seed);
        let init_latent = self.encode_batch(image.clone(), sample.batch_size)?;
        let latent = noise_to_start(init_latent.clone(), &sampler, end, &mut rng);

        let mut inpainting = Inpainting {
            latent: init_latent,
            pixels: image,
            mask,
            feedback: config.feedback,
            auto_mask: config.auto_mask,
            rng,
        };
        debug!(
            feedback = config.feedback,
            auto_mask = config.auto_mask,
            "Inpainting"
        );

        let plan = LoopPlan {
            end,
            guidance_scale: sample.guidance_scale,
            progress: sample.progress,
            step_output,
        };
        let latent = self.denoise(
            latent,
            &conditioning,
            &sampler,
            &plan,
            Some(&mut inpainting),
            &mut callback,
        )?;
        self.finish(latent, Some(&inpainting))
    }

    /// Encode `[0, 255]` pixels `[batch, H, W, 3]` to latents
    pub fn encode_image(&self, image: Tensor<B, 4>) -> Result<Tensor<B, 4>> {
        let batch_size = image.dims()[0];
        check_image(image.dims(), batch_size)?;
        self.encode_batch(image, batch_size)
    }

    /// Encode an image and noise it to the strength-selected timestep
    ///
    /// Uses the same step selection as [`StableDiffusion::image_to_image`], so
    /// the result can be passed to [`StableDiffusion::diffuse`] with the same
    /// strength.
    pub fn noisy_image_latent(
        &self,
        image: Tensor<B, 4>,
        config: &Img2ImgConfig,
    ) -> Result<Tensor<B, 4>> {
        let sample = &config.sample;
        let (sampler, end) = image_schedule(image.dims(), sample, config.strength)?;

        let mut rng = noise_generator(sample.seed);
        let init_latent = self.encode_batch(image, sample.batch_size)?;
        Ok(noise_to_start(init_latent, &sampler, end, &mut rng))
    }

    /// Noise `latent` with the given noise at the strength-selected timestep
    ///
    /// Returns `noise` unchanged when there is no latent to noise.
    pub fn add_noise_latent(
        &self,
        noise: Tensor<B, 4>,
        latent: Option<Tensor<B, 4>>,
        steps: usize,
        strength: f64,
        temperature: f64,
    ) -> Result<Tensor<B, 4>> {
        let Some(latent) = latent else {
            return Ok(noise);
        };

        check_strength(strength)?;
        let sampler = DdimSampler::new(default_schedule(steps)?);
        if noise.dims() != latent.dims() {
            return Err(PipelineError::Validation(format!(
                "noise shape {:?} does not match latent shape {:?}",
                noise.dims(),
                latent.dims()
            )));
        }

        let end = strength_index(sampler.schedule(), strength, temperature);
        let timestep = sampler.schedule().timesteps()[end];
        Ok(mix_noise(latent, noise, timestep))
    }

    fn sample_full<F>(
        &self,
        latent: Tensor<B, 4>,
        conditioning: &Conditioning<B>,
        sampler: &DdimSampler,
        config: &SampleConfig,
        step_output: StepOutput,
        callback: &mut F,
    ) -> Result<ImageBatch>
    where
        F: FnMut(StepInfo<B>),
    {
        let plan = LoopPlan {
            end: sampler.num_steps(),
            guidance_scale: config.guidance_scale,
            progress: config.progress,
            step_output,
        };
        let latent = self.denoise(latent, conditioning, sampler, &plan, None, callback)?;
        self.finish(latent, None)
    }

    /// Encode `[0, 255]` pixels and repeat a single image over the batch
    fn encode_batch(&self, image: Tensor<B, 4>, batch_size: usize) -> Result<Tensor<B, 4>> {
        let latent = self.codec.encode(pixel_to_unit_range(image))?;
        let [batch, _, _, channels] = latent.dims();
        if channels != LATENT_CHANNELS {
            return Err(PipelineError::inference(
                Stage::Encode,
                format!("encoder returned {} channels, expected {}", channels, LATENT_CHANNELS),
            ));
        }
        if batch == 1 && batch_size > 1 {
            return Ok(latent.repeat_dim(0, batch_size));
        }
        Ok(latent)
    }
}

/// Validate an image-conditioned call and pick its schedule prefix
fn image_schedule(
    image_dims: [usize; 4],
    config: &SampleConfig,
    strength: f64,
) -> Result<(DdimSampler, usize)> {
    check_strength(strength)?;
    if config.batch_size == 0 {
        return Err(PipelineError::InvalidConfig(
            "batch size must be positive".to_string(),
        ));
    }
    check_image(image_dims, config.batch_size)?;

    let sampler = DdimSampler::new(default_schedule(config.steps)?);
    let end = strength_index(sampler.schedule(), strength, config.temperature);
    Ok((sampler, end))
}

/// Noise the encoded image to the timestep at schedule index `end`
fn noise_to_start<B: Backend>(
    init_latent: Tensor<B, 4>,
    sampler: &DdimSampler,
    end: usize,
    rng: &mut NoiseGenerator,
) -> Tensor<B, 4> {
    let timestep = sampler.schedule().timesteps()[end];
    debug!(timestep, executed = end, "Noising image latent");
    add_noise(init_latent, timestep, None, rng)
}

/// Check a caller-supplied latent is `[batch, h, w, 4]` with no empty axis
pub(crate) fn check_latent<B: Backend>(latent: &Tensor<B, 4>) -> Result<()> {
    let dims = latent.dims();
    if dims[3] != LATENT_CHANNELS || dims.iter().any(|&d| d == 0) {
        return Err(PipelineError::Validation(format!(
            "latent shape {:?} is not [batch, h, w, {}]",
            dims, LATENT_CHANNELS
        )));
    }
    Ok(())
}

/// Check a `[batch, H, W, 3]` pixel image against the requested batch size
fn check_image(dims: [usize; 4], batch_size: usize) -> Result<()> {
    let [batch, height, width, channels] = dims;
    if channels != 3 {
        return Err(PipelineError::Validation(format!(
            "image has {} channels, expected 3",
            channels
        )));
    }
    check_image_size(width, height).map_err(PipelineError::Validation)?;
    if batch != 1 && batch != batch_size {
        return Err(PipelineError::Validation(format!(
            "image batch {} does not match batch size {}",
            batch, batch_size
        )));
    }
    Ok(())
}
