//! Question/review/answer batch types

use crate::error::{Error, Result};
use crate::variant::ModelVariant;
use crate::vocab::TokenId;

/// A rectangular block of token IDs (batch_size x seq_len flattened)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatrix {
    /// Token IDs, row-major
    pub ids: Vec<TokenId>,
    /// Number of sequences
    pub batch_size: usize,
    /// Length every row is padded to
    pub seq_len: usize,
}

impl TokenMatrix {
    /// Build a matrix from per-example sequences, padding ragged rows
    pub fn from_rows(sequences: &[Vec<TokenId>], pad_id: TokenId) -> Self {
        if sequences.is_empty() {
            return Self {
                ids: Vec::new(),
                batch_size: 0,
                seq_len: 0,
            };
        }

        let batch_size = sequences.len();
        let seq_len = sequences.iter().map(Vec::len).max().unwrap_or(0);

        let mut ids = Vec::with_capacity(batch_size * seq_len);
        for seq in sequences {
            ids.extend_from_slice(seq);
            ids.extend(std::iter::repeat_n(pad_id, seq_len - seq.len()));
        }

        Self {
            ids,
            batch_size,
            seq_len,
        }
    }

    /// Get the token IDs for a specific batch item
    pub fn sequence(&self, batch_idx: usize) -> Option<&[TokenId]> {
        if batch_idx >= self.batch_size {
            return None;
        }
        let start = batch_idx * self.seq_len;
        Some(&self.ids[start..start + self.seq_len])
    }

    /// Get a single token by batch item and position
    pub fn token_at(&self, batch_idx: usize, position: usize) -> Option<TokenId> {
        if batch_idx >= self.batch_size || position >= self.seq_len {
            return None;
        }
        Some(self.ids[batch_idx * self.seq_len + position])
    }
}

/// One mini-batch of training data.
///
/// Answers and their true (unpadded) lengths are always present; question
/// and review sequences are attached only when the data pipeline produced
/// them. Which of the optional fields actually reach the model is decided
/// by [`decompose`](Self::decompose), never by callers picking fields ad
/// hoc.
#[derive(Debug, Clone)]
pub struct QaBatch {
    /// Target answer sequences
    pub answers: TokenMatrix,
    /// True length of each answer row, before padding
    pub answer_lengths: Vec<usize>,
    /// Question sequences, if the pipeline produced them
    pub questions: Option<TokenMatrix>,
    /// Review sequences, if the pipeline produced them
    pub reviews: Option<TokenMatrix>,
}

impl QaBatch {
    /// Create a batch carrying only answers
    pub fn new(answers: TokenMatrix, answer_lengths: Vec<usize>) -> Self {
        Self {
            answers,
            answer_lengths,
            questions: None,
            reviews: None,
        }
    }

    /// Attach question sequences
    pub fn with_questions(mut self, questions: TokenMatrix) -> Self {
        self.questions = Some(questions);
        self
    }

    /// Attach review sequences
    pub fn with_reviews(mut self, reviews: TokenMatrix) -> Self {
        self.reviews = Some(reviews);
        self
    }

    /// Number of examples in the batch
    pub fn batch_size(&self) -> usize {
        self.answers.batch_size
    }

    /// Select the input streams the given variant feeds to the model.
    ///
    /// Streams the variant does not use come back as `None` even when the
    /// batch carries them; streams it requires but the batch lacks are a
    /// [`MissingBatchField`](Error::MissingBatchField) error.
    pub fn decompose(&self, variant: ModelVariant) -> Result<ModelInput<'_>> {
        let questions = if variant.uses_questions() {
            Some(
                self.questions
                    .as_ref()
                    .ok_or(Error::MissingBatchField("question"))?,
            )
        } else {
            None
        };

        let reviews = if variant.uses_reviews() {
            Some(
                self.reviews
                    .as_ref()
                    .ok_or(Error::MissingBatchField("review"))?,
            )
        } else {
            None
        };

        Ok(ModelInput {
            questions,
            reviews,
            answers: &self.answers,
        })
    }
}

/// Exactly the streams one forward pass receives
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    /// Question tokens, absent for answers-only models
    pub questions: Option<&'a TokenMatrix>,
    /// Review tokens, present only for the questions+reviews variant
    pub reviews: Option<&'a TokenMatrix>,
    /// Target answer tokens (decoder input under teacher forcing)
    pub answers: &'a TokenMatrix,
}
