//! Text encoder contract and batching

use burn::prelude::*;
use burn::tensor::Int;
use burn_ldm_core::ModelError;

use crate::tokens::{MAX_TEXT_LEN, position_ids};

/// Width of each context vector
pub const CONTEXT_DIM: usize = 768;

/// Transformer text encoder collaborator
///
/// Maps `tokens` and `positions`, both `[batch, 77]`, to a context tensor
/// `[batch, 77, 768]`. Must be a pure function of its inputs.
pub trait TextEncoder<B: Backend>: Send + Sync {
    fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        positions: Tensor<B, 2, Int>,
    ) -> Result<Tensor<B, 3>, ModelError>;
}

/// Repeat one padded token row over a batch: `[batch, 77]`
pub fn token_batch<B: Backend>(
    tokens: &[u32; MAX_TEXT_LEN],
    batch_size: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let row: Vec<i32> = tokens.iter().map(|&t| t as i32).collect();
    repeat_row(row, batch_size, device)
}

/// Position IDs repeated over a batch: `[batch, 77]`
pub fn position_batch<B: Backend>(batch_size: usize, device: &B::Device) -> Tensor<B, 2, Int> {
    repeat_row(position_ids().to_vec(), batch_size, device)
}

fn repeat_row<B: Backend>(
    row: Vec<i32>,
    batch_size: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let data: Vec<i32> = row.iter().copied().cycle().take(row.len() * batch_size).collect();
    Tensor::from_data(TensorData::new(data, [batch_size, MAX_TEXT_LEN]), device)
}

/// Encode a padded token sequence into a `[batch, 77, 768]` context
pub fn encode_tokens<B: Backend>(
    encoder: &dyn TextEncoder<B>,
    tokens: &[u32; MAX_TEXT_LEN],
    batch_size: usize,
    device: &B::Device,
) -> Result<Tensor<B, 3>, ModelError> {
    encoder.forward(
        token_batch(tokens, batch_size, device),
        position_batch(batch_size, device),
    )
}
