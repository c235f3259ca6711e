//! Pipeline errors

use std::fmt;

use burn_ldm_core::ModelError;
use burn_ldm_samplers::ScheduleError;
use burn_ldm_vae::CodecError;
use thiserror::Error;

/// Pipeline stage a collaborator failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Tokenize,
    TextEncode,
    Encode,
    Denoise,
    Decode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Tokenize => "tokenize",
            Stage::TextEncode => "text encode",
            Stage::Encode => "encode",
            Stage::Denoise => "denoise",
            Stage::Decode => "decode",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad caller input, detected before any model runs
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid schedule: {0}")]
    Config(#[from] ScheduleError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Inference failed during {stage}: {source}")]
    Inference {
        stage: Stage,
        #[source]
        source: ModelError,
    },
}

impl PipelineError {
    pub fn inference(stage: Stage, source: impl Into<ModelError>) -> Self {
        PipelineError::Inference {
            stage,
            source: source.into(),
        }
    }

    /// Whether this is a configuration error (schedule or parameters)
    pub fn is_config(&self) -> bool {
        matches!(self, PipelineError::Config(_) | PipelineError::InvalidConfig(_))
    }

    /// Stage of an inference failure
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Inference { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<CodecError> for PipelineError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Encode(source) => PipelineError::inference(Stage::Encode, source),
            CodecError::Decode(source) => PipelineError::inference(Stage::Decode, source),
            CodecError::Shape(msg) | CodecError::Range(msg) => PipelineError::Validation(msg),
            err @ CodecError::Data(_) => PipelineError::inference(Stage::Decode, err),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
