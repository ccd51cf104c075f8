//! Crate-wide error types

use thiserror::Error;

/// Errors raised by configuration, training, and checkpointing.
#[derive(Debug, Error)]
pub enum Error {
    /// The `model_name` hyperparameter names a variant this crate does not support.
    #[error(
        "unsupported model variant: {0} (must be one of: answers, question_answers, question_answers_reviews)"
    )]
    UnsupportedVariant(String),

    /// A required hyperparameter is absent from the params store.
    #[error("missing hyperparameter: {0}")]
    MissingParam(&'static str),

    /// A hyperparameter is present but mistyped or out of range.
    #[error("invalid hyperparameter {key}: {reason}")]
    InvalidParam {
        key: &'static str,
        reason: String,
    },

    /// A batch field required by the active variant is absent.
    #[error("batch has no {0} sequences, required by the active model variant")]
    MissingBatchField(&'static str),

    /// Loss inputs evaluated over an empty batch.
    #[error("cannot compute loss over an empty batch")]
    EmptyBatch,

    /// Loss inputs disagree on batch dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Checkpoint or vocabulary I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Weights, params, or vocabulary failed to encode/decode.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
