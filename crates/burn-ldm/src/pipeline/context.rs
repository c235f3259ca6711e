//! Prompt tokenization and text conditioning

use burn::prelude::*;
use burn_ldm_clip::{MAX_TEXT_LEN, UNCONDITIONAL_TOKENS, encode_tokens, pad_tokens};
use tracing::debug;

use super::{Conditioning, StableDiffusion};
use crate::error::{PipelineError, Result, Stage};

impl<B: Backend> StableDiffusion<B> {
    /// Encode a prompt pair into reusable text contexts
    ///
    /// Both prompts are tokenized and length-checked before the text encoder
    /// runs. Without a negative prompt the unconditional context comes from
    /// the empty-prompt tokens.
    pub fn tokenize(
        &self,
        prompt: &str,
        negative_prompt: Option<&str>,
        batch_size: usize,
    ) -> Result<Conditioning<B>> {
        if batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }

        let cond_tokens = self.prompt_tokens(prompt, "Prompt")?;
        let uncond_tokens = match negative_prompt {
            Some(negative) => self.prompt_tokens(negative, "Negative prompt")?,
            None => UNCONDITIONAL_TOKENS,
        };

        let cond = self.encode_text(&cond_tokens, batch_size)?;
        let uncond = self.encode_text(&uncond_tokens, batch_size)?;
        debug!(batch_size, "Encoded text conditioning");

        Ok(Conditioning { cond, uncond })
    }

    /// Convert token IDs back to text
    pub fn decode_tokens(&self, tokens: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(tokens)
            .map_err(|e| PipelineError::inference(Stage::Tokenize, e))
    }

    fn prompt_tokens(&self, text: &str, what: &str) -> Result<[u32; MAX_TEXT_LEN]> {
        let tokens = self
            .tokenizer
            .encode(text)
            .map_err(|e| PipelineError::inference(Stage::Tokenize, e))?;
        pad_tokens(&tokens).map_err(|e| PipelineError::Validation(format!("{}: {}", what, e)))
    }

    fn encode_text(&self, tokens: &[u32; MAX_TEXT_LEN], batch_size: usize) -> Result<Tensor<B, 3>> {
        encode_tokens(self.text_encoder.as_ref(), tokens, batch_size, &self.device)
            .map_err(|e| PipelineError::inference(Stage::TextEncode, e))
    }
}
