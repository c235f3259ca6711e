//! CLIP text conditioning contracts
//!
//! The tokenizer and transformer are external collaborators; this crate fixes
//! their interfaces and the 77-token padding rules around them.

pub mod encoder;
pub mod tokens;

pub use encoder::{CONTEXT_DIM, TextEncoder, encode_tokens, position_batch, token_batch};
pub use tokens::{
    END_OF_TEXT, MAX_TEXT_LEN, PAD_TOKEN, PromptError, START_OF_TEXT, Tokenizer,
    UNCONDITIONAL_TOKENS, pad_tokens, position_ids,
};
