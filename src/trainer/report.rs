//! Training and evaluation result types

/// Result of a full training run
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Number of epochs completed
    pub epochs_completed: usize,
    /// Number of batch steps taken across all epochs
    pub batches_seen: usize,
    /// Loss of the last training batch (0 when no batches ran)
    pub final_loss: f32,
    /// Perplexity of the last training batch (0 when no batches ran)
    pub final_perplexity: f32,
    /// Number of checkpoints written during the run
    pub checkpoints_written: usize,
    /// Total wall-clock time in seconds
    pub elapsed_secs: f64,
}

/// Result of an evaluation pass
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Mean loss across evaluated batches
    pub mean_loss: f32,
    /// Mean perplexity across evaluated batches
    pub mean_perplexity: f32,
    /// Number of batches evaluated
    pub num_batches: usize,
}
