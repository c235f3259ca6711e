//! Collaborator error type

/// Error reported by an external model (tokenizer, text encoder, UNet or VAE)
///
/// The pipeline wraps it with the stage that failed.
pub type ModelError = Box<dyn std::error::Error + Send + Sync>;
