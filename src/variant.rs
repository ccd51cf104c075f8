//! Model variant tags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which input streams the model consumes.
///
/// Parsed once from the `model_name` hyperparameter when a trainer is
/// built; unknown names fail there, before any batch is touched. Both the
/// training and evaluation paths dispatch on this tag through
/// [`QaBatch::decompose`](crate::QaBatch::decompose), so the two can never
/// disagree on which fields a variant needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    /// Decode answers with no conditioning input
    #[serde(rename = "answers")]
    AnswersOnly,
    /// Condition on question tokens
    #[serde(rename = "question_answers")]
    QuestionAnswers,
    /// Condition on question and review tokens
    #[serde(rename = "question_answers_reviews")]
    QuestionAnswersReviews,
}

impl ModelVariant {
    /// Wire name used in params files and checkpoint paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnswersOnly => "answers",
            Self::QuestionAnswers => "question_answers",
            Self::QuestionAnswersReviews => "question_answers_reviews",
        }
    }

    /// Check if the model consumes question tokens
    pub fn uses_questions(&self) -> bool {
        !matches!(self, Self::AnswersOnly)
    }

    /// Check if the model consumes review tokens
    pub fn uses_reviews(&self) -> bool {
        matches!(self, Self::QuestionAnswersReviews)
    }
}

impl FromStr for ModelVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answers" => Ok(Self::AnswersOnly),
            "question_answers" => Ok(Self::QuestionAnswers),
            "question_answers_reviews" => Ok(Self::QuestionAnswersReviews),
            other => Err(Error::UnsupportedVariant(other.to_string())),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
