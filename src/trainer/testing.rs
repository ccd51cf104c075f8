//! Shared fixtures for the trainer test modules

use ndarray::{Array1, Array2};

use crate::batch::{ModelInput, QaBatch, TokenMatrix};
use crate::constants;
use crate::device::Device;
use crate::model::{ModelOutput, SequenceModel};
use crate::params::Params;
use crate::tensor::Tensor;

/// Recording model that emits uniform log-probabilities.
///
/// Every forward call returns `-ln(vocab_size)` at each output cell, so
/// expected losses have closed forms. The stub logs what the trainer
/// handed it: forcing decisions, which conditioning streams were present,
/// and device moves.
pub(crate) struct StubModel {
    pub(crate) weights: Tensor,
    pub(crate) vocab_size: usize,
    pub(crate) forward_calls: usize,
    pub(crate) backward_calls: usize,
    pub(crate) forcing_log: Vec<bool>,
    pub(crate) saw_questions: Vec<bool>,
    pub(crate) saw_reviews: Vec<bool>,
    pub(crate) device_moves: Vec<Device>,
}

impl StubModel {
    pub(crate) fn new(vocab_size: usize) -> Self {
        Self {
            weights: Tensor::from_vec(vec![0.5; 4], true),
            vocab_size,
            forward_calls: 0,
            backward_calls: 0,
            forcing_log: Vec::new(),
            saw_questions: Vec::new(),
            saw_reviews: Vec::new(),
            device_moves: Vec::new(),
        }
    }
}

impl SequenceModel for StubModel {
    fn forward(&mut self, input: ModelInput<'_>, teacher_forcing: bool) -> ModelOutput {
        self.forward_calls += 1;
        self.forcing_log.push(teacher_forcing);
        self.saw_questions.push(input.questions.is_some());
        self.saw_reviews.push(input.reviews.is_some());

        let uniform = -(self.vocab_size as f32).ln();
        let log_probs = (0..input.answers.seq_len)
            .map(|_| Array2::from_elem((input.answers.batch_size, self.vocab_size), uniform))
            .collect();
        ModelOutput::new(log_probs)
    }

    fn backward(&mut self, output_grads: &[Array2<f32>]) {
        self.backward_calls += 1;
        // Collapse the incoming gradients to one scalar and spread it over
        // the weights, enough to make optimizer steps observable.
        let total: f32 = output_grads.iter().map(|step| step.sum()).sum();
        self.weights
            .accumulate_grad(&Array1::from_elem(self.weights.len(), total));
    }

    fn parameters(&self) -> Vec<Tensor> {
        vec![self.weights.clone()]
    }

    fn state_dict(&self) -> Vec<(String, Tensor)> {
        vec![("stub.weights".to_string(), self.weights.clone())]
    }

    fn to_device(&mut self, device: Device) {
        self.device_moves.push(device);
    }
}

/// Two answer rows over a 4-token vocabulary, padded to 2 steps.
///
/// Lengths [2, 1] make 3 active positions, so the uniform stub's loss is
/// `3 * ln(4) / 2`.
pub(crate) fn answers_batch() -> QaBatch {
    let answers = TokenMatrix::from_rows(&[vec![1, 2], vec![3]], 0);
    QaBatch::new(answers, vec![2, 1])
}

/// `answers_batch` plus question and review streams
pub(crate) fn full_batch() -> QaBatch {
    let questions = TokenMatrix::from_rows(&[vec![2, 0, 1], vec![1]], 0);
    let reviews = TokenMatrix::from_rows(&[vec![3, 3], vec![0, 2]], 0);
    answers_batch().with_questions(questions).with_reviews(reviews)
}

/// Minimal parameter store that passes training validation.
///
/// Decay is parked far past the two configured epochs so tests opt into
/// it explicitly.
pub(crate) fn training_params(variant: &str) -> Params {
    Params::new()
        .with(constants::MODEL_NAME, variant)
        .with(constants::VOCAB_SIZE, 4)
        .with(constants::HIDDEN_DIM, 8)
        .with(constants::OUTPUT_MAX_LEN, 2)
        .with(constants::EPOCHS, 2)
        .with(constants::LEARNING_RATE, 0.01)
        .with(constants::LR_DECAY, 0.1)
        .with(constants::DECAY_START_EPOCH, 100)
        .with(constants::TEACHER_FORCING_RATIO, 1.0)
}
