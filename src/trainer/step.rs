//! Single-batch training step

use rand::Rng;

use super::core::Trainer;
use crate::batch::QaBatch;
use crate::error::Result;
use crate::loss::masked_nll;
use crate::model::SequenceModel;

impl<M: SequenceModel> Trainer<M> {
    /// Run one optimization step over a batch.
    ///
    /// Zeroes accumulated gradients, decomposes the batch for the active
    /// variant, draws this batch's teacher-forcing decision (one Bernoulli
    /// draw against `teacher_forcing_ratio`), runs the model forward,
    /// computes the masked NLL, backpropagates, and applies one optimizer
    /// step.
    ///
    /// # Returns
    ///
    /// Scalar loss value for this batch
    pub fn train_batch(&mut self, batch: &QaBatch) -> Result<f32> {
        self.optimizer.zero_grad(&mut self.parameters);

        let input = batch.decompose(self.variant)?;
        let teacher_forcing = self.rng.random::<f64>() < self.teacher_forcing_ratio;

        let output = self.model.forward(input, teacher_forcing);
        let loss = masked_nll(&output, &batch.answers, &batch.answer_lengths)?;

        self.model.backward(&loss.output_grads);
        self.optimizer.step(&mut self.parameters);

        Ok(loss.value)
    }
}
