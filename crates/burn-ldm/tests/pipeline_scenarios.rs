//! End-to-end pipeline runs over deterministic stub models.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use burn::prelude::*;
use burn::tensor::Int;
use burn_ldm::{
    DenoisingModel, DiffuseConfig, ImageBatch, ImageDecoder, ImageEncoder, Img2ImgConfig,
    InpaintConfig, ModelError, PipelineError, SampleConfig, Stage, StableDiffusion, StepOutput,
    TextEncoder, Tokenizer,
};
use burn_ldm_clip::{CONTEXT_DIM, END_OF_TEXT, START_OF_TEXT};
use burn_ldm_samplers::ScheduleError;
use burn_ldm_vae::mask_from_pixels;
use burn_ndarray::NdArray;

type TestBackend = NdArray;

const SIZE: usize = 64;

#[derive(Default, Clone)]
struct Calls {
    text: Arc<AtomicUsize>,
    unet: Arc<AtomicUsize>,
    encode: Arc<AtomicUsize>,
    decode: Arc<AtomicUsize>,
}

impl Calls {
    fn models(&self) -> usize {
        self.text.load(Ordering::SeqCst)
            + self.unet.load(Ordering::SeqCst)
            + self.encode.load(Ordering::SeqCst)
            + self.decode.load(Ordering::SeqCst)
    }
}

/// One token per whitespace-separated word
struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, ModelError> {
        let mut tokens = vec![START_OF_TEXT];
        tokens.extend(
            text.split_whitespace()
                .map(|w| 1000 + w.bytes().map(u32::from).sum::<u32>()),
        );
        tokens.push(END_OF_TEXT);
        Ok(tokens)
    }

    fn decode(&self, tokens: &[u32]) -> Result<String, ModelError> {
        Ok(tokens
            .iter()
            .filter(|&&t| t != START_OF_TEXT && t != END_OF_TEXT)
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Embeds each token as a constant row scaled by the end-of-text ID
struct StubTextEncoder {
    calls: Arc<AtomicUsize>,
}

impl TextEncoder<TestBackend> for StubTextEncoder {
    fn forward(
        &self,
        tokens: Tensor<TestBackend, 2, Int>,
        _positions: Tensor<TestBackend, 2, Int>,
    ) -> Result<Tensor<TestBackend, 3>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let [batch, len] = tokens.dims();
        Ok(tokens
            .float()
            .div_scalar(END_OF_TEXT as f64)
            .reshape([batch, len, 1])
            .repeat_dim(2, CONTEXT_DIM))
    }
}

/// Noise estimate that depends on the latent, timestep and context
struct StubUnet {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl DenoisingModel<TestBackend> for StubUnet {
    fn forward(
        &self,
        latent: Tensor<TestBackend, 4>,
        time_embedding: Tensor<TestBackend, 2>,
        context: Tensor<TestBackend, 3>,
    ) -> Result<Tensor<TestBackend, 4>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("unet exploded".into());
        }
        let [b, h, w, c] = latent.dims();
        let spread =
            |t: Tensor<TestBackend, 4>| t.repeat_dim(1, h).repeat_dim(2, w).repeat_dim(3, c);

        let ctx = spread(context.mean_dim(2).mean_dim(1).reshape([b, 1, 1, 1]));
        let temb = spread(time_embedding.mean_dim(1).reshape([b, 1, 1, 1]));
        Ok(latent.mul_scalar(0.1) + ctx.mul_scalar(0.5) + temb.mul_scalar(0.01))
    }
}

/// Noise estimate that is NaN everywhere
struct NanUnet;

impl DenoisingModel<TestBackend> for NanUnet {
    fn forward(
        &self,
        latent: Tensor<TestBackend, 4>,
        _time_embedding: Tensor<TestBackend, 2>,
        _context: Tensor<TestBackend, 3>,
    ) -> Result<Tensor<TestBackend, 4>, ModelError> {
        Ok(latent.mul_scalar(f32::NAN))
    }
}

/// 8x8 average pooling plus a channel-mean fourth channel
struct PoolEncoder {
    calls: Arc<AtomicUsize>,
}

impl ImageEncoder<TestBackend> for PoolEncoder {
    fn encode(&self, pixels: Tensor<TestBackend, 4>) -> Result<Tensor<TestBackend, 4>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let [b, height, width, _] = pixels.dims();
        let (h, w) = (height / 8, width / 8);

        let blocks: Tensor<TestBackend, 6> = pixels.reshape([b, h, 8, w, 8, 3]);
        let pooled: Tensor<TestBackend, 4> = blocks.mean_dim(4).mean_dim(2).reshape([b, h, w, 3]);
        let extra = pooled.clone().mean_dim(3);
        Ok(Tensor::cat(vec![pooled, extra], 3))
    }
}

/// Nearest-neighbour upsampling of the first three channels
struct UpsampleDecoder {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl ImageDecoder<TestBackend> for UpsampleDecoder {
    fn decode(&self, latent: Tensor<TestBackend, 4>) -> Result<Tensor<TestBackend, 4>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("decoder exploded".into());
        }
        let [b, h, w, _] = latent.dims();
        let rgb = latent.slice([0..b, 0..h, 0..w, 0..3]);
        let cells: Tensor<TestBackend, 6> = rgb.reshape([b, h, 1, w, 1, 3]);
        Ok(cells
            .repeat_dim(2, 8)
            .repeat_dim(4, 8)
            .reshape([b, h * 8, w * 8, 3]))
    }
}

fn build(calls: &Calls, fail_unet: bool, fail_decoder: bool) -> StableDiffusion<TestBackend> {
    let device = <TestBackend as Backend>::Device::default();
    StableDiffusion::new(
        Box::new(WordTokenizer),
        Box::new(StubTextEncoder {
            calls: calls.text.clone(),
        }),
        Box::new(StubUnet {
            calls: calls.unet.clone(),
            fail: fail_unet,
        }),
        Box::new(PoolEncoder {
            calls: calls.encode.clone(),
        }),
        Box::new(UpsampleDecoder {
            calls: calls.decode.clone(),
            fail: fail_decoder,
        }),
        &device,
    )
}

fn pipeline() -> (StableDiffusion<TestBackend>, Calls) {
    let calls = Calls::default();
    (build(&calls, false, false), calls)
}

fn sample_config(seed: u64) -> SampleConfig {
    SampleConfig {
        width: SIZE,
        height: SIZE,
        seed: Some(seed),
        ..Default::default()
    }
}

/// Image that is constant over each 8x8 block, values in [40, 180]
fn block_image_values() -> Vec<f32> {
    let mut values = Vec::with_capacity(SIZE * SIZE * 3);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let level = ((x / 8 + y / 8) % 8) as f32;
            for c in 0..3 {
                values.push(40.0 + 20.0 * level - 5.0 * c as f32 + 10.0);
            }
        }
    }
    values
}

fn block_image() -> Tensor<TestBackend, 4> {
    let device = <TestBackend as Backend>::Device::default();
    Tensor::from_data(
        TensorData::new(block_image_values(), [1, SIZE, SIZE, 3]),
        &device,
    )
}

fn constant_mask(value: f32) -> Tensor<TestBackend, 4> {
    let device = <TestBackend as Backend>::Device::default();
    Tensor::full([1, SIZE, SIZE, 1], value, &device)
}

fn mean_abs_diff(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let total: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x as f64 - y as f64).abs())
        .sum();
    total / a.len() as f64
}

fn image_bytes() -> Vec<u8> {
    block_image_values().into_iter().map(|v| v as u8).collect()
}

fn long_prompt(words: usize) -> String {
    vec!["apple"; words].join(" ")
}

#[test]
fn test_txt2img_is_reproducible() {
    let (pipeline, _) = pipeline();
    let config = sample_config(42);

    let first = pipeline.text_to_image("a red apple", None, &config).unwrap();
    let second = pipeline.text_to_image("a red apple", None, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!((first.batch, first.height, first.width), (1, SIZE, SIZE));
    assert_eq!(first.data.len(), SIZE * SIZE * 3);
}

#[test]
fn test_txt2img_seed_changes_output() {
    let (pipeline, _) = pipeline();
    let a = pipeline.text_to_image("a red apple", None, &sample_config(1)).unwrap();
    let b = pipeline.text_to_image("a red apple", None, &sample_config(2)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_txt2img_model_call_counts() {
    let (pipeline, calls) = pipeline();
    pipeline.text_to_image("a red apple", None, &sample_config(3)).unwrap();

    assert_eq!(calls.text.load(Ordering::SeqCst), 2);
    assert_eq!(calls.unet.load(Ordering::SeqCst), 2 * 25);
    assert_eq!(calls.encode.load(Ordering::SeqCst), 0);
    assert_eq!(calls.decode.load(Ordering::SeqCst), 1);
}

#[test]
fn test_txt2img_batch() {
    let (pipeline, _) = pipeline();
    let config = SampleConfig {
        batch_size: 2,
        ..sample_config(5)
    };
    let images = pipeline.text_to_image("a red apple", None, &config).unwrap();
    assert_eq!(images.batch, 2);
    assert_eq!(images.images().count(), 2);
    assert_ne!(images.image(0), images.image(1));
}

#[test]
fn test_unit_guidance_ignores_negative_prompt() {
    let (pipeline, _) = pipeline();
    let config = SampleConfig {
        guidance_scale: 1.0,
        ..sample_config(9)
    };

    let a = pipeline.text_to_image("a red apple", Some("blurry"), &config).unwrap();
    let b = pipeline.text_to_image("a red apple", Some("green pear"), &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_zero_guidance_ignores_prompt() {
    let (pipeline, _) = pipeline();
    let config = SampleConfig {
        guidance_scale: 0.0,
        ..sample_config(9)
    };

    let a = pipeline.text_to_image("a red apple", None, &config).unwrap();
    let b = pipeline.text_to_image("a lighthouse at night", None, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_step_callback_walks_schedule_backwards() {
    let (pipeline, _) = pipeline();
    let mut seen = Vec::new();

    pipeline
        .text_to_image_with_callback(
            "a red apple",
            None,
            &sample_config(4),
            StepOutput::Latent,
            |info| {
                assert_eq!(info.total_steps, 25);
                let output = info.output.expect("latent output");
                assert_eq!(output.dims(), [1, SIZE / 8, SIZE / 8, 4]);
                seen.push((info.step, info.index, info.timestep));
            },
        )
        .unwrap();

    assert_eq!(seen.len(), 25);
    assert_eq!(seen[0], (0, 24, 961));
    assert_eq!(seen[24], (24, 0, 1));
    assert!(seen.windows(2).all(|w| w[0].2 > w[1].2));
}

#[test]
fn test_decoded_step_output() {
    let (pipeline, calls) = pipeline();
    let config = SampleConfig {
        steps: 5,
        ..sample_config(4)
    };
    let mut outputs = 0;

    pipeline
        .text_to_image_with_callback("a red apple", None, &config, StepOutput::Decoded, |info| {
            let pixels = info.output.expect("decoded output");
            assert_eq!(pixels.dims(), [1, SIZE, SIZE, 3]);
            outputs += 1;
        })
        .unwrap();

    assert_eq!(outputs, 5);
    assert_eq!(calls.decode.load(Ordering::SeqCst), 6);
}

#[test]
fn test_img2img_zero_strength_round_trips_image() {
    let (pipeline, calls) = pipeline();
    let config = Img2ImgConfig {
        sample: sample_config(11),
        strength: 0.0,
    };

    let out = pipeline
        .image_to_image(block_image(), "a red apple", None, &config)
        .unwrap();

    assert_eq!(calls.unet.load(Ordering::SeqCst), 0);
    let diff = mean_abs_diff(&out.data, &image_bytes());
    assert!(diff < 12.0, "mean abs diff {}", diff);
}

#[test]
fn test_img2img_full_strength_starts_at_last_timestep() {
    let (pipeline, calls) = pipeline();
    let config = Img2ImgConfig {
        sample: sample_config(11),
        strength: 1.0,
    };
    let mut first_timestep = None;

    let full = pipeline
        .image_to_image_with_callback(
            block_image(),
            "a red apple",
            None,
            &config,
            StepOutput::None,
            |info| {
                first_timestep.get_or_insert(info.timestep);
                assert_eq!(info.total_steps, 24);
            },
        )
        .unwrap();

    // Noise is injected at 961, so the first executed step is the next one down
    assert_eq!(first_timestep, Some(921));
    assert_eq!(calls.unet.load(Ordering::SeqCst), 2 * 24);

    let light = pipeline
        .image_to_image(
            block_image(),
            "a red apple",
            None,
            &Img2ImgConfig {
                strength: 0.0,
                ..config
            },
        )
        .unwrap();
    assert!(
        mean_abs_diff(&full.data, &image_bytes()) > mean_abs_diff(&light.data, &image_bytes())
    );
}

#[test]
fn test_img2img_full_strength_approaches_txt2img() {
    let (pipeline, _) = pipeline();
    let sample = sample_config(11);
    let config = Img2ImgConfig {
        sample: sample.clone(),
        strength: 1.0,
    };

    let full = pipeline
        .image_to_image(block_image(), "a red apple", None, &config)
        .unwrap();
    let fresh = pipeline.text_to_image("a red apple", None, &sample).unwrap();

    let to_fresh = mean_abs_diff(&full.data, &fresh.data);
    let to_source = mean_abs_diff(&full.data, &image_bytes());
    assert!(to_fresh < 12.0, "mean abs diff to txt2img {}", to_fresh);
    assert!(to_fresh < to_source);
}

#[test]
fn test_img2img_is_reproducible() {
    let (pipeline, _) = pipeline();
    let config = Img2ImgConfig {
        sample: sample_config(21),
        strength: 0.6,
    };
    let a = pipeline.image_to_image(block_image(), "a red apple", None, &config).unwrap();
    let b = pipeline.image_to_image(block_image(), "a red apple", None, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_inpaint_full_mask_keeps_source() {
    let (pipeline, _) = pipeline();
    let config = InpaintConfig {
        sample: sample_config(8),
        ..Default::default()
    };

    let out = pipeline
        .inpaint(block_image(), constant_mask(1.0), "a red apple", None, &config)
        .unwrap();
    assert_eq!(out.data, image_bytes());
}

#[test]
fn test_inpaint_empty_mask_matches_img2img() {
    let (pipeline, _) = pipeline();
    let sample = sample_config(8);

    let inpainted = pipeline
        .inpaint(
            block_image(),
            constant_mask(0.0),
            "a red apple",
            None,
            &InpaintConfig {
                sample: sample.clone(),
                strength: 0.5,
                ..Default::default()
            },
        )
        .unwrap();
    let transformed = pipeline
        .image_to_image(
            block_image(),
            "a red apple",
            None,
            &Img2ImgConfig {
                sample,
                strength: 0.5,
            },
        )
        .unwrap();

    assert_eq!(inpainted, transformed);
}

#[test]
fn test_inpaint_auto_mask_cannot_widen_empty_mask() {
    let (pipeline, _) = pipeline();
    let base = InpaintConfig {
        sample: sample_config(8),
        ..Default::default()
    };

    let plain = pipeline
        .inpaint(block_image(), constant_mask(0.0), "a red apple", None, &base)
        .unwrap();
    let auto = pipeline
        .inpaint(
            block_image(),
            constant_mask(0.0),
            "a red apple",
            None,
            &InpaintConfig {
                auto_mask: true,
                ..base
            },
        )
        .unwrap();

    assert_eq!(plain, auto);
}

#[test]
fn test_inpaint_decoded_steps_are_composited() {
    let (pipeline, _) = pipeline();
    let config = InpaintConfig {
        sample: sample_config(8),
        strength: 0.4,
        ..Default::default()
    };
    let expected = image_bytes();
    let mut outputs = 0;

    pipeline
        .inpaint_with_callback(
            block_image(),
            constant_mask(1.0),
            "a red apple",
            None,
            &config,
            StepOutput::Decoded,
            |info| {
                let pixels = info.output.expect("decoded output");
                let bytes: Vec<u8> = pixels
                    .into_data()
                    .to_vec::<f32>()
                    .unwrap()
                    .into_iter()
                    .map(|v| v as u8)
                    .collect();
                assert_eq!(bytes, expected);
                outputs += 1;
            },
        )
        .unwrap();

    assert_eq!(outputs, 10);
}

#[test]
fn test_inpaint_feedback_reencodes_each_step() {
    let (pipeline, calls) = pipeline();
    let config = InpaintConfig {
        sample: sample_config(13),
        strength: 0.5,
        feedback: true,
        ..Default::default()
    };

    let out = pipeline
        .inpaint(block_image(), constant_mask(0.5), "a red apple", None, &config)
        .unwrap();
    assert_eq!(out.batch, 1);

    // 12 executed steps, feedback after all but the last
    assert_eq!(calls.unet.load(Ordering::SeqCst), 2 * 12);
    assert_eq!(calls.encode.load(Ordering::SeqCst), 1 + 11);
    assert_eq!(calls.decode.load(Ordering::SeqCst), 2 * 11 + 1);

    let again = pipeline
        .inpaint(block_image(), constant_mask(0.5), "a red apple", None, &config)
        .unwrap();
    assert_eq!(out, again);
}

#[test]
fn test_inpaint_rejects_mismatched_mask() {
    let (pipeline, calls) = pipeline();
    let device = <TestBackend as Backend>::Device::default();
    let mask = Tensor::ones([1, SIZE / 2, SIZE, 1], &device);

    let err = pipeline
        .inpaint(block_image(), mask, "a red apple", None, &InpaintConfig::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert_eq!(calls.models(), 0);
}

#[test]
fn test_inpaint_rejects_eight_bit_mask() {
    let (pipeline, calls) = pipeline();
    let config = InpaintConfig {
        sample: sample_config(8),
        ..Default::default()
    };

    let err = pipeline
        .inpaint(block_image(), constant_mask(255.0), "a red apple", None, &config)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert_eq!(calls.models(), 0);

    let out = pipeline
        .inpaint(
            block_image(),
            mask_from_pixels(constant_mask(255.0)),
            "a red apple",
            None,
            &config,
        )
        .unwrap();
    assert_eq!(out.data, image_bytes());
}

#[test]
fn test_split_api_matches_generate_from_noise() {
    let (pipeline, _) = pipeline();
    let noise = pipeline.noise_latent(1, SIZE, SIZE, Some(17)).unwrap();

    let direct = pipeline
        .generate_from_noise(noise.clone(), "a red apple", None, &sample_config(0))
        .unwrap();

    let conditioning = pipeline.tokenize("a red apple", None, 1).unwrap();
    let split = pipeline
        .diffuse(noise, &conditioning, &DiffuseConfig::default())
        .unwrap();

    assert_eq!(direct, split);
}

#[test]
fn test_generate_from_context_matches_txt2img() {
    let (pipeline, _) = pipeline();
    let config = sample_config(23);

    let conditioning = pipeline.tokenize("a red apple", Some("blurry"), 1).unwrap();
    let cached = pipeline.generate_from_context(&conditioning, None, &config).unwrap();
    let direct = pipeline.text_to_image("a red apple", Some("blurry"), &config).unwrap();

    assert_eq!(cached, direct);
}

#[test]
fn test_noisy_image_latent_diffuses_like_img2img() {
    let (pipeline, _) = pipeline();
    let config = Img2ImgConfig {
        sample: sample_config(31),
        strength: 0.5,
    };

    let latent = pipeline.noisy_image_latent(block_image(), &config).unwrap();
    let conditioning = pipeline.tokenize("a red apple", None, 1).unwrap();
    let split = pipeline
        .diffuse(
            latent,
            &conditioning,
            &DiffuseConfig {
                strength: Some(0.5),
                ..Default::default()
            },
        )
        .unwrap();

    let direct = pipeline
        .image_to_image(block_image(), "a red apple", None, &config)
        .unwrap();
    assert_eq!(split, direct);
}

#[test]
fn test_add_noise_latent() {
    let (pipeline, _) = pipeline();
    let noise = pipeline.noise_latent(1, SIZE, SIZE, Some(1)).unwrap();

    let unchanged = pipeline.add_noise_latent(noise.clone(), None, 25, 0.5, 1.0).unwrap();
    assert_eq!(
        unchanged.into_data().to_vec::<f32>().unwrap(),
        noise.clone().into_data().to_vec::<f32>().unwrap()
    );

    let latent = pipeline.encode_image(block_image()).unwrap();
    let a = pipeline
        .add_noise_latent(noise.clone(), Some(latent.clone()), 25, 0.5, 1.0)
        .unwrap();
    let b = pipeline
        .add_noise_latent(noise, Some(latent.clone()), 25, 0.5, 1.0)
        .unwrap();
    assert_eq!(
        a.into_data().to_vec::<f32>().unwrap(),
        b.into_data().to_vec::<f32>().unwrap()
    );

    let wrong = pipeline.noise_latent(2, SIZE, SIZE, Some(1)).unwrap();
    assert!(matches!(
        pipeline.add_noise_latent(wrong, Some(latent), 25, 0.5, 1.0),
        Err(PipelineError::Validation(_))
    ));
}

#[test]
fn test_encode_image_shape() {
    let (pipeline, calls) = pipeline();
    let latent = pipeline.encode_image(block_image()).unwrap();
    assert_eq!(latent.dims(), [1, SIZE / 8, SIZE / 8, 4]);
    assert_eq!(calls.encode.load(Ordering::SeqCst), 1);
}

#[test]
fn test_decode_tokens() {
    let (pipeline, _) = pipeline();
    let text = pipeline
        .decode_tokens(&[START_OF_TEXT, 1234, 5678, END_OF_TEXT])
        .unwrap();
    assert_eq!(text, "1234 5678");
}

#[test]
fn test_long_prompt_is_rejected_before_any_model_call() {
    let (pipeline, calls) = pipeline();

    // start + 75 words + end = 77 tokens
    let err = pipeline
        .text_to_image(&long_prompt(75), None, &sample_config(1))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    let err = pipeline
        .text_to_image("a red apple", Some(&long_prompt(75)), &sample_config(1))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    assert_eq!(calls.models(), 0);
}

#[test]
fn test_longest_accepted_prompt() {
    let (pipeline, _) = pipeline();
    assert!(pipeline.tokenize(&long_prompt(74), None, 1).is_ok());
}

#[test]
fn test_zero_steps_is_config_error() {
    let (pipeline, calls) = pipeline();
    let config = SampleConfig {
        steps: 0,
        ..sample_config(1)
    };

    let err = pipeline.text_to_image("a red apple", None, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Config(ScheduleError::ZeroSteps)));
    assert!(err.is_config());
    assert_eq!(calls.models(), 0);
}

#[test]
fn test_invalid_dimensions_are_config_errors() {
    let (pipeline, _) = pipeline();

    let odd_size = SampleConfig {
        width: 60,
        ..sample_config(1)
    };
    assert!(matches!(
        pipeline.text_to_image("a red apple", None, &odd_size),
        Err(PipelineError::InvalidConfig(_))
    ));

    let no_batch = SampleConfig {
        batch_size: 0,
        ..sample_config(1)
    };
    assert!(matches!(
        pipeline.text_to_image("a red apple", None, &no_batch),
        Err(PipelineError::InvalidConfig(_))
    ));

    let bad_strength = Img2ImgConfig {
        sample: sample_config(1),
        strength: 1.5,
    };
    assert!(matches!(
        pipeline.image_to_image(block_image(), "a red apple", None, &bad_strength),
        Err(PipelineError::InvalidConfig(_))
    ));
}

#[test]
fn test_failing_unet_reports_denoise_stage() {
    let calls = Calls::default();
    let pipeline = build(&calls, true, false);

    let err = pipeline
        .text_to_image("a red apple", None, &sample_config(1))
        .unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Denoise));
    assert!(err.to_string().contains("unet exploded"));
    assert_eq!(calls.decode.load(Ordering::SeqCst), 0);
}

#[test]
fn test_non_finite_latent_still_decodes() {
    let calls = Calls::default();
    let device = <TestBackend as Backend>::Device::default();
    let pipeline = StableDiffusion::new(
        Box::new(WordTokenizer),
        Box::new(StubTextEncoder {
            calls: calls.text.clone(),
        }),
        Box::new(NanUnet),
        Box::new(PoolEncoder {
            calls: calls.encode.clone(),
        }),
        Box::new(UpsampleDecoder {
            calls: calls.decode.clone(),
            fail: false,
        }),
        &device,
    );
    let config = SampleConfig {
        steps: 3,
        ..sample_config(5)
    };

    let out = pipeline.text_to_image("a red apple", None, &config).unwrap();
    assert_eq!(out.data.len(), SIZE * SIZE * 3);
    assert_eq!(calls.decode.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_decoder_reports_decode_stage() {
    let calls = Calls::default();
    let pipeline = build(&calls, false, true);
    let config = SampleConfig {
        steps: 2,
        ..sample_config(1)
    };

    let err = pipeline.text_to_image("a red apple", None, &config).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Decode));
}

#[test]
fn test_concurrent_calls_do_not_interfere() {
    let (pipeline, _) = pipeline();
    let config_a = SampleConfig {
        steps: 10,
        ..sample_config(100)
    };
    let config_b = SampleConfig {
        steps: 10,
        ..sample_config(200)
    };

    let expected_a = pipeline.text_to_image("a red apple", None, &config_a).unwrap();
    let expected_b = pipeline.text_to_image("a green pear", None, &config_b).unwrap();

    let (a, b): (ImageBatch, ImageBatch) = std::thread::scope(|scope| {
        let a = scope.spawn(|| pipeline.text_to_image("a red apple", None, &config_a).unwrap());
        let b = scope.spawn(|| pipeline.text_to_image("a green pear", None, &config_b).unwrap());
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a, expected_a);
    assert_eq!(b, expected_b);
}
