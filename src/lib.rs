//! Training loop for sequence-to-sequence question answering models.
//!
//! This crate provides:
//! - Batch decomposition for the three model variants (answers only,
//!   question conditioned, question and review conditioned)
//! - Masked negative log-likelihood over padded answer batches, with the
//!   matching output gradients
//! - A [`Trainer`] that drives epochs, per-batch teacher forcing, a
//!   one-shot learning-rate decay, and periodic checkpointing
//! - Timestamped checkpoints holding safetensors weights, the run's
//!   parameter store as JSON, and the vocabulary
//!
//! The network itself stays behind the [`SequenceModel`] trait: the
//! trainer drives forward and backward passes and snapshots named
//! weights, and everything architecture-specific lives in the
//! implementor.

pub mod batch;
pub mod checkpoint;
pub mod constants;
pub mod device;
pub mod error;
pub mod loss;
pub mod model;
pub mod optim;
pub mod params;
pub mod tensor;
pub mod trainer;
pub mod variant;
pub mod vocab;

pub use batch::{ModelInput, QaBatch, TokenMatrix};
pub use checkpoint::CheckpointWriter;
pub use device::Device;
pub use error::{Error, Result};
pub use loss::{masked_nll, perplexity, BatchLoss};
pub use model::{ModelOutput, SequenceModel};
pub use optim::{Optimizer, SGD};
pub use params::Params;
pub use tensor::Tensor;
pub use trainer::{EvalReport, TrainHistory, TrainReport, Trainer, TrainerOptions};
pub use variant::ModelVariant;
pub use vocab::{TokenId, Vocabulary};
