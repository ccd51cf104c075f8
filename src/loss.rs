//! Masked NLL loss and perplexity

use ndarray::Array2;

use crate::batch::TokenMatrix;
use crate::error::{Error, Result};
use crate::model::ModelOutput;

/// Scalar loss for one batch plus the gradients the model resumes from.
#[derive(Debug, Clone)]
pub struct BatchLoss {
    /// Masked NLL, normalized by the number of timesteps
    pub value: f32,
    /// `d value / d log_probs[t]`, same shapes as the forward output
    pub output_grads: Vec<Array2<f32>>,
}

/// Masked negative log-likelihood over variable-length answers.
///
/// Each example carries a remaining-length counter initialized from
/// `target_lengths`. At timestep `t` only examples whose counter is still
/// positive contribute, comparing `outputs[t]` against column `t` of
/// `targets`; afterwards every counter is decremented (saturating), active
/// or not. The accumulated sum is divided by the number of timesteps only,
/// never by the per-step active count, so short sequences weigh less per
/// example than long ones. Iteration covers exactly the timesteps the
/// model produced, even when a recorded length runs past them.
pub fn masked_nll(
    outputs: &ModelOutput,
    targets: &TokenMatrix,
    target_lengths: &[usize],
) -> Result<BatchLoss> {
    let batch_size = targets.batch_size;
    if batch_size == 0 {
        return Err(Error::EmptyBatch);
    }
    if target_lengths.len() != batch_size {
        return Err(Error::ShapeMismatch(format!(
            "batch has {} examples but {} target lengths",
            batch_size,
            target_lengths.len()
        )));
    }
    let num_steps = outputs.num_steps();
    if num_steps == 0 {
        return Err(Error::ShapeMismatch(
            "model produced no output timesteps".to_string(),
        ));
    }

    let inv_steps = 1.0 / num_steps as f32;
    let mut remaining = target_lengths.to_vec();
    let mut total = 0.0_f32;
    let mut output_grads = Vec::with_capacity(num_steps);

    for (t, step) in outputs.log_probs.iter().enumerate() {
        if step.nrows() != batch_size {
            return Err(Error::ShapeMismatch(format!(
                "step {} has {} rows for a batch of {}",
                t,
                step.nrows(),
                batch_size
            )));
        }

        let mut grad = Array2::<f32>::zeros(step.raw_dim());
        for b in 0..batch_size {
            if remaining[b] == 0 {
                continue;
            }
            let target = targets.token_at(b, t).ok_or_else(|| {
                Error::ShapeMismatch(format!(
                    "no answer token at step {t} for example {b}"
                ))
            })? as usize;
            if target >= step.ncols() {
                return Err(Error::ShapeMismatch(format!(
                    "target id {} out of range at step {} (vocab {})",
                    target,
                    t,
                    step.ncols()
                )));
            }
            total -= step[[b, target]];
            grad[[b, target]] = -inv_steps;
        }

        // Every counter ticks down, active or not.
        for r in &mut remaining {
            *r = r.saturating_sub(1);
        }
        output_grads.push(grad);
    }

    Ok(BatchLoss {
        value: total * inv_steps,
        output_grads,
    })
}

/// Perplexity of a recorded loss value, computed as `2^loss`.
///
/// The NLL accumulates natural logs, so this is a base-2 exponentiation of
/// a nat-denominated loss rather than a strict information-theoretic
/// perplexity. The convention is kept as-is so recorded histories stay
/// comparable run over run.
pub fn perplexity(loss: f32) -> f32 {
    2.0_f32.powf(loss)
}
