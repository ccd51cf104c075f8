//! Training orchestration: construction, stepping, epochs, and evaluation
//!
//! [`Trainer`] owns the model, the parameter store, the optimizer, and the
//! checkpoint writer. The per-batch step lives in `step`, the epoch loop
//! and learning-rate decay in `epoch`, and the read-only evaluation pass
//! in `eval`.

mod core;
mod epoch;
mod eval;
mod history;
mod report;
mod step;
#[cfg(test)]
pub(crate) mod testing;

pub use self::core::{Trainer, TrainerOptions};
pub use history::TrainHistory;
pub use report::{EvalReport, TrainReport};
