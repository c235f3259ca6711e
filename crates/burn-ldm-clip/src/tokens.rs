//! CLIP token sequences
//!
//! Prompts are tokenized by an external [`Tokenizer`] and padded here to the
//! fixed 77-token window the text encoder expects.

use burn_ldm_core::ModelError;
use thiserror::Error;

/// Length of every token sequence fed to the text encoder
pub const MAX_TEXT_LEN: usize = 77;

/// Special token IDs
pub const START_OF_TEXT: u32 = 49406;
pub const END_OF_TEXT: u32 = 49407;

/// Token ID used to fill sequences up to [`MAX_TEXT_LEN`]
pub const PAD_TOKEN: u32 = END_OF_TEXT;

/// Tokens of the empty prompt, used for the unconditional context
pub const UNCONDITIONAL_TOKENS: [u32; MAX_TEXT_LEN] = unconditional_tokens();

const fn unconditional_tokens() -> [u32; MAX_TEXT_LEN] {
    let mut tokens = [PAD_TOKEN; MAX_TEXT_LEN];
    tokens[0] = START_OF_TEXT;
    tokens
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Prompt is too long: {tokens} tokens (should be < {max})")]
    TooLong { tokens: usize, max: usize },
}

/// Text tokenizer collaborator
///
/// `encode` returns the full token sequence, including start and end tokens.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<u32>, ModelError>;

    fn decode(&self, tokens: &[u32]) -> Result<String, ModelError>;
}

/// Pad a token sequence with [`PAD_TOKEN`] up to [`MAX_TEXT_LEN`]
///
/// Sequences of 77 tokens or more are rejected rather than truncated.
pub fn pad_tokens(tokens: &[u32]) -> Result<[u32; MAX_TEXT_LEN], PromptError> {
    if tokens.len() >= MAX_TEXT_LEN {
        return Err(PromptError::TooLong {
            tokens: tokens.len(),
            max: MAX_TEXT_LEN,
        });
    }

    let mut padded = [PAD_TOKEN; MAX_TEXT_LEN];
    padded[..tokens.len()].copy_from_slice(tokens);
    Ok(padded)
}

/// Position IDs `0..77`
pub fn position_ids() -> [i32; MAX_TEXT_LEN] {
    std::array::from_fn(|i| i as i32)
}
