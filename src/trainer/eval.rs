//! Read-only evaluation pass

use super::core::Trainer;
use super::report::EvalReport;
use crate::batch::QaBatch;
use crate::error::Result;
use crate::loss::{masked_nll, perplexity};
use crate::model::SequenceModel;

impl<M: SequenceModel> Trainer<M> {
    /// Evaluate over `batches` with teacher forcing off and no updates.
    ///
    /// Runs the same per-batch computation as training, minus the backward
    /// pass and optimizer step: parameters, gradients, the RNG, and the
    /// training history are all left untouched. Logs and returns the mean
    /// loss and mean perplexity over the batches.
    pub fn evaluate(&mut self, batches: &[QaBatch]) -> Result<EvalReport> {
        let mut total_loss = 0.0_f32;
        let mut total_ppl = 0.0_f32;
        let mut num_batches = 0;

        for batch in batches {
            let input = batch.decompose(self.variant)?;
            let output = self.model.forward(input, false);
            let loss = masked_nll(&output, &batch.answers, &batch.answer_lengths)?;

            total_loss += loss.value;
            total_ppl += perplexity(loss.value);
            num_batches += 1;
        }

        let mean_loss = safe_avg(total_loss, num_batches);
        let mean_perplexity = safe_avg(total_ppl, num_batches);
        println!("Eval: {num_batches} batches, loss={mean_loss:.4}, ppl={mean_perplexity:.4}");

        Ok(EvalReport {
            mean_loss,
            mean_perplexity,
            num_batches,
        })
    }
}

/// Average that tolerates an empty set
fn safe_avg(total: f32, count: usize) -> f32 {
    if count > 0 {
        total / count as f32
    } else {
        0.0
    }
}
