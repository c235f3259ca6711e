//! Sinusoidal timestep embedding

use burn::prelude::*;

/// Embedding width the SD 1.x UNet expects
pub const TIME_EMBED_DIM: usize = 320;

/// Longest period of the sinusoid frequencies
pub const DEFAULT_MAX_PERIOD: f64 = 10000.0;

/// Compute the sinusoidal embedding of a raw timestep
///
/// With `half = dim / 2` and `freq_i = exp(-ln(max_period) * i / half)`, the
/// row is `[cos(t * freq_0), ..., cos(t * freq_{half-1}), sin(t * freq_0), ...]`.
/// The row is repeated over `batch_size`, giving `[batch_size, 2 * half]`.
pub fn timestep_embedding<B: Backend>(
    timestep: usize,
    dim: usize,
    max_period: f64,
    batch_size: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let half = dim / 2;
    let t = timestep as f64;

    let args: Vec<f64> = (0..half)
        .map(|i| {
            let freq = (-max_period.ln() * i as f64 / half as f64).exp();
            t * freq
        })
        .collect();

    let row: Vec<f32> = args
        .iter()
        .map(|a| a.cos() as f32)
        .chain(args.iter().map(|a| a.sin() as f32))
        .collect();
    let width = row.len();

    let data: Vec<f32> = row.iter().copied().cycle().take(width * batch_size).collect();
    Tensor::from_data(TensorData::new(data, [batch_size, width]), device)
}
