//! Recorded per-batch training metrics

/// Per-batch loss and perplexity, kept for the lifetime of a run.
///
/// One entry is appended per training batch and never pruned; the cadence
/// log reads the most recent pair, and the final report reads the last.
#[derive(Debug, Clone, Default)]
pub struct TrainHistory {
    losses: Vec<f32>,
    perplexities: Vec<f32>,
}

impl TrainHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one batch
    pub(crate) fn record(&mut self, loss: f32, perplexity: f32) {
        self.losses.push(loss);
        self.perplexities.push(perplexity);
    }

    /// Recorded loss values, oldest first
    pub fn losses(&self) -> &[f32] {
        &self.losses
    }

    /// Recorded perplexity values, oldest first
    pub fn perplexities(&self) -> &[f32] {
        &self.perplexities
    }

    /// Most recent recorded loss
    pub fn last_loss(&self) -> Option<f32> {
        self.losses.last().copied()
    }

    /// Most recent recorded perplexity
    pub fn last_perplexity(&self) -> Option<f32> {
        self.perplexities.last().copied()
    }

    /// Number of recorded batches
    pub fn len(&self) -> usize {
        self.losses.len()
    }

    /// Check if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }
}
