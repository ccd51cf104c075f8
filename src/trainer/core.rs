//! Core trainer struct and construction-time validation

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::history::TrainHistory;
use crate::checkpoint::CheckpointWriter;
use crate::constants;
use crate::device::Device;
use crate::error::Result;
use crate::model::SequenceModel;
use crate::optim::{Optimizer, SGD};
use crate::params::Params;
use crate::tensor::Tensor;
use crate::variant::ModelVariant;
use crate::vocab::Vocabulary;

/// Run-shaping knobs that are not model hyperparameters
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// Seed for the trainer's RNG (teacher-forcing draws)
    pub random_seed: u64,
    /// Checkpoint every this many epochs
    pub save_model_every: usize,
    /// Log every this many batches
    pub print_every: usize,
    /// Root directory checkpoints are written under
    pub checkpoint_dir: PathBuf,
    /// Vocabulary persisted with every checkpoint
    pub vocab: Vocabulary,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            random_seed: 1,
            save_model_every: 1,
            print_every: 100,
            checkpoint_dir: PathBuf::from(constants::CHECKPOINT_ROOT),
            vocab: Vocabulary::new(),
        }
    }
}

impl TrainerOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set the checkpoint cadence in epochs
    pub fn with_save_model_every(mut self, epochs: usize) -> Self {
        self.save_model_every = epochs.max(1);
        self
    }

    /// Set the logging cadence in batches
    pub fn with_print_every(mut self, batches: usize) -> Self {
        self.print_every = batches.max(1);
        self
    }

    /// Set the checkpoint root directory
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = dir.into();
        self
    }

    /// Attach the vocabulary persisted with checkpoints
    pub fn with_vocab(mut self, vocab: Vocabulary) -> Self {
        self.vocab = vocab;
        self
    }
}

/// Orchestrates the epochs × batches loop over a sequence model.
///
/// Everything configurable is resolved when the trainer is built: the
/// params store is validated, the variant parsed, the RNG seeded, and the
/// model moved to its device. All fields stay populated for the trainer's
/// whole lifetime, so a trainer can train, evaluate, and checkpoint in any
/// order after construction.
pub struct Trainer<M: SequenceModel> {
    /// The network under training
    pub(crate) model: M,

    /// Hyperparameter store, read-only from here on
    pub(crate) params: Params,

    /// Variant parsed from `model_name`
    pub(crate) variant: ModelVariant,

    /// Shared handles to the model's learnable parameters
    pub(crate) parameters: Vec<Tensor>,

    /// Optimizer; replaced wholesale when the decay epoch is reached
    pub(crate) optimizer: Box<dyn Optimizer>,

    /// Seeded RNG for per-batch teacher-forcing draws
    pub(crate) rng: StdRng,

    /// Run-shaping knobs
    pub(crate) options: TrainerOptions,

    /// Checkpoint destination for this model name
    pub(crate) writer: CheckpointWriter,

    /// Device the model was placed on
    pub(crate) device: Device,

    /// Cached `teacher_forcing_ratio`, read every batch
    pub(crate) teacher_forcing_ratio: f64,

    /// Per-batch metrics for the lifetime of the run
    pub history: TrainHistory,
}

impl<M: SequenceModel> Trainer<M> {
    /// Build a trainer, validating configuration up front.
    ///
    /// The params store must pass
    /// [`validate_for_training`](Params::validate_for_training); in
    /// particular an unknown `model_name` is rejected here, before any
    /// batch is touched. The model is moved to `device` once, and the
    /// optimizer starts as SGD at the configured learning rate.
    pub fn new(
        mut model: M,
        params: Params,
        device: Device,
        options: TrainerOptions,
    ) -> Result<Self> {
        params.validate_for_training()?;
        let variant = params.variant()?;
        let model_name = params.model_name()?.to_string();
        let lr = params.learning_rate()?;
        let teacher_forcing_ratio = params.teacher_forcing_ratio()?;

        model.to_device(device);
        let parameters = model.parameters();
        let writer = CheckpointWriter::new(options.checkpoint_dir.clone(), model_name);
        let rng = StdRng::seed_from_u64(options.random_seed);

        Ok(Self {
            model,
            params,
            variant,
            parameters,
            optimizer: Box::new(SGD::new(lr, 0.0)),
            rng,
            options,
            writer,
            device,
            teacher_forcing_ratio,
            history: TrainHistory::new(),
        })
    }

    /// Get current learning rate
    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }

    /// Set learning rate on the current optimizer
    pub fn set_lr(&mut self, lr: f32) {
        self.optimizer.set_lr(lr);
    }

    /// Replace the optimizer
    pub fn set_optimizer(&mut self, optimizer: Box<dyn Optimizer>) {
        self.optimizer = optimizer;
    }

    /// Hyperparameter store
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Active model variant
    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Device the model was placed on
    pub fn device(&self) -> Device {
        self.device
    }

    /// The model under training
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Shared handles to the model's learnable parameters
    pub fn parameters(&self) -> &[Tensor] {
        &self.parameters
    }

    /// Vocabulary persisted with checkpoints
    pub fn vocab(&self) -> &Vocabulary {
        &self.options.vocab
    }

    /// Write a checkpoint stamped with the current time
    pub fn save_checkpoint(&self) -> Result<PathBuf> {
        self.save_checkpoint_at(Utc::now())
    }

    /// Write a checkpoint into the directory for `time`
    pub fn save_checkpoint_at(&self, time: DateTime<Utc>) -> Result<PathBuf> {
        self.writer
            .save_at(time, &self.model.state_dict(), &self.params, &self.options.vocab)
    }
}
