//! Sequence model contract

use ndarray::Array2;

use crate::batch::ModelInput;
use crate::device::Device;
use crate::tensor::Tensor;

/// Per-timestep output of one forward pass.
///
/// `log_probs[t]` is a `[batch_size, vocab_size]` matrix of log
/// probabilities for decoder step `t`. How many steps come back is the
/// model's choice (typically capped by its configured maximum output
/// length); the loss iterates over exactly the steps present.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// One log-probability matrix per decoder timestep
    pub log_probs: Vec<Array2<f32>>,
}

impl ModelOutput {
    /// Wrap per-step log-probability matrices
    pub fn new(log_probs: Vec<Array2<f32>>) -> Self {
        Self { log_probs }
    }

    /// Number of decoder timesteps produced
    pub fn num_steps(&self) -> usize {
        self.log_probs.len()
    }
}

/// Contract between the trainer and the encoder/decoder network.
///
/// The crate is deliberately ignorant of the architecture behind this
/// trait: recurrence, attention, and the autograd graph all live in the
/// implementor. The trainer only drives the zero-grad → forward → loss →
/// backward → step cycle and snapshots parameters for checkpoints.
pub trait SequenceModel {
    /// Run one forward pass over a decomposed batch.
    ///
    /// With `teacher_forcing` set, the decoder consumes the true previous
    /// answer token at each step instead of its own prediction.
    fn forward(&mut self, input: ModelInput<'_>, teacher_forcing: bool) -> ModelOutput;

    /// Backpropagate from the gradients of the loss with respect to the
    /// log-probabilities the last `forward` returned, accumulating into
    /// parameter gradients.
    fn backward(&mut self, output_grads: &[Array2<f32>]);

    /// Learnable parameters as shared handles (clones share storage)
    fn parameters(&self) -> Vec<Tensor>;

    /// Named weight snapshot for checkpointing
    fn state_dict(&self) -> Vec<(String, Tensor)>;

    /// Move the network's tensors to the given device.
    ///
    /// Called once, before the first epoch. Host-only implementations can
    /// keep the default no-op.
    fn to_device(&mut self, _device: Device) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    struct NoopModel {
        weights: Tensor,
    }

    impl SequenceModel for NoopModel {
        fn forward(&mut self, input: ModelInput<'_>, _teacher_forcing: bool) -> ModelOutput {
            let steps = input.answers.seq_len;
            let rows = input.answers.batch_size;
            ModelOutput::new(vec![Array2::zeros((rows, 4)); steps])
        }

        fn backward(&mut self, _output_grads: &[Array2<f32>]) {}

        fn parameters(&self) -> Vec<Tensor> {
            vec![self.weights.clone()]
        }

        fn state_dict(&self) -> Vec<(String, Tensor)> {
            vec![("weights".to_string(), self.weights.clone())]
        }
    }

    #[test]
    fn test_output_step_count() {
        use crate::batch::{QaBatch, TokenMatrix};

        let batch = QaBatch::new(
            TokenMatrix::from_rows(&[vec![1, 2, 3]], 0),
            vec![3],
        );
        let mut model = NoopModel {
            weights: Tensor::zeros(2, true),
        };
        let input = batch.decompose(crate::ModelVariant::AnswersOnly).unwrap();
        let output = model.forward(input, true);
        assert_eq!(output.num_steps(), 3);
    }

    #[test]
    fn test_default_to_device_is_noop() {
        let mut model = NoopModel {
            weights: Tensor::zeros(2, true),
        };
        model.to_device(Device::Cuda);
        assert_eq!(model.parameters().len(), 1);
    }
}
