//! Hyperparameter keys and checkpoint artifact names

/// Hyperparameter key: vocabulary size consumed by the model.
pub const VOCAB_SIZE: &str = "vocab_size";

/// Hyperparameter key: hidden dimension of the encoder/decoder.
pub const HIDDEN_DIM: &str = "hidden_dim";

/// Hyperparameter key: maximum decoded output length.
pub const OUTPUT_MAX_LEN: &str = "output_max_len";

/// Hyperparameter key: number of hidden layers.
pub const HIDDEN_LAYERS: &str = "hidden_layers";

/// Hyperparameter key: dropout probability.
pub const DROPOUT: &str = "dropout";

/// Hyperparameter key: number of training epochs.
pub const EPOCHS: &str = "epochs";

/// Hyperparameter key: configured learning rate.
pub const LEARNING_RATE: &str = "learning_rate";

/// Hyperparameter key: multiplicative decay factor applied to the
/// configured learning rate.
pub const LR_DECAY: &str = "lr_decay";

/// Hyperparameter key: epoch index at which the decayed rate is installed.
pub const DECAY_START_EPOCH: &str = "decay_start_epoch";

/// Hyperparameter key: per-batch probability of teacher forcing.
pub const TEACHER_FORCING_RATIO: &str = "teacher_forcing_ratio";

/// Hyperparameter key: model variant name, parsed into
/// [`ModelVariant`](crate::ModelVariant) at startup.
pub const MODEL_NAME: &str = "model_name";

/// Default root directory for checkpoints.
pub const CHECKPOINT_ROOT: &str = "checkpoints";

/// Weight snapshot filename inside a checkpoint directory.
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Hyperparameter filename inside a checkpoint directory.
pub const PARAMS_FILE: &str = "params.json";

/// Vocabulary filename inside a checkpoint directory.
pub const VOCAB_FILE: &str = "vocab.bin";

/// Timestamp layout for checkpoint directory names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
