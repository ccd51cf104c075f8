//! Epoch loop: cadence logging, checkpointing, learning-rate decay

use std::time::Instant;

use super::core::Trainer;
use super::report::TrainReport;
use crate::batch::QaBatch;
use crate::error::Result;
use crate::loss::perplexity;
use crate::model::SequenceModel;
use crate::optim::SGD;

impl<M: SequenceModel> Trainer<M> {
    /// Train over `batches` for the configured number of epochs.
    ///
    /// Per epoch, batches run in slice order through
    /// [`train_batch`](Self::train_batch); every batch's loss and
    /// perplexity are appended to the history, and every `print_every`
    /// batches the most recent pair is logged. At the epoch boundary a
    /// checkpoint is written when `epoch % save_model_every == 0`, and
    /// when the decay epoch is reached the optimizer is replaced by one
    /// running at `learning_rate * lr_decay`, computed from the configured
    /// rate rather than the current one.
    ///
    /// # Returns
    ///
    /// A [`TrainReport`] summarizing the run
    pub fn train(&mut self, batches: &[QaBatch]) -> Result<TrainReport> {
        let epochs = self.params.epochs()?;
        let decay_start = self.params.decay_start_epoch()?;
        let start = Instant::now();
        let mut checkpoints_written = 0;

        for epoch in 0..epochs {
            println!("Epoch {}/{} (lr={:.6})", epoch + 1, epochs, self.lr());

            for (i, batch) in batches.iter().enumerate() {
                let loss = self.train_batch(batch)?;
                let ppl = perplexity(loss);
                self.history.record(loss, ppl);

                if i.is_multiple_of(self.options.print_every) {
                    println!("Epoch {epoch}, Batch {i}: loss={loss:.4}, ppl={ppl:.4}");
                }
            }

            if epoch.is_multiple_of(self.options.save_model_every) {
                self.save_checkpoint()?;
                checkpoints_written += 1;
            }

            if epoch == decay_start {
                self.decay_learning_rate()?;
            }
        }

        Ok(TrainReport {
            epochs_completed: epochs,
            batches_seen: epochs * batches.len(),
            final_loss: self.history.last_loss().unwrap_or(0.0),
            final_perplexity: self.history.last_perplexity().unwrap_or(0.0),
            checkpoints_written,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }

    /// Install a fresh SGD at the decayed rate.
    ///
    /// The rate is `learning_rate * lr_decay` from the params store, so a
    /// repeated trigger lands on the same rate instead of compounding.
    pub(crate) fn decay_learning_rate(&mut self) -> Result<()> {
        let lr = self.params.learning_rate()? * self.params.lr_decay()?;
        self.optimizer = Box::new(SGD::new(lr, 0.0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::{Trainer, TrainerOptions};
    use super::super::testing::{answers_batch, training_params, StubModel};
    use crate::constants;
    use crate::device::Device;
    use approx::assert_abs_diff_eq;
    use tempfile::TempDir;

    fn trainer_in(dir: &TempDir, params: crate::Params) -> Trainer<StubModel> {
        Trainer::new(
            StubModel::new(4),
            params,
            Device::Cpu,
            TrainerOptions::default().with_checkpoint_dir(dir.path()),
        )
        .unwrap()
    }

    #[test]
    fn test_history_grows_per_batch() {
        let tmp = TempDir::new().unwrap();
        let mut trainer = trainer_in(&tmp, training_params("answers"));
        let batches = vec![answers_batch(); 3];

        let report = trainer.train(&batches).unwrap();

        // 2 epochs x 3 batches
        assert_eq!(trainer.history.len(), 6);
        assert_eq!(report.epochs_completed, 2);
        assert_eq!(report.batches_seen, 6);
        assert_eq!(report.final_loss, trainer.history.last_loss().unwrap());
    }

    #[test]
    fn test_history_pairs_loss_with_base_two_perplexity() {
        let tmp = TempDir::new().unwrap();
        let mut trainer = trainer_in(&tmp, training_params("answers"));

        trainer.train(&vec![answers_batch(); 2]).unwrap();

        for (loss, ppl) in trainer
            .history
            .losses()
            .iter()
            .zip(trainer.history.perplexities())
        {
            assert_abs_diff_eq!(*ppl, 2.0_f32.powf(*loss), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_checkpoints_written_every_epoch_by_default() {
        let tmp = TempDir::new().unwrap();
        let mut trainer = trainer_in(&tmp, training_params("answers"));

        let report = trainer.train(&[answers_batch()]).unwrap();

        assert_eq!(report.checkpoints_written, 2);
        let model_dir = tmp.path().join("answers");
        assert!(model_dir.is_dir());
        assert!(model_dir.read_dir().unwrap().count() >= 1);
    }

    #[test]
    fn test_checkpoint_cadence_respected() {
        let tmp = TempDir::new().unwrap();
        let params = training_params("answers").with(constants::EPOCHS, 5);
        let mut trainer = Trainer::new(
            StubModel::new(4),
            params,
            Device::Cpu,
            TrainerOptions::default()
                .with_checkpoint_dir(tmp.path())
                .with_save_model_every(2),
        )
        .unwrap();

        let report = trainer.train(&[answers_batch()]).unwrap();

        // Epochs 0, 2, 4
        assert_eq!(report.checkpoints_written, 3);
    }

    #[test]
    fn test_decay_installs_configured_times_factor() {
        let tmp = TempDir::new().unwrap();
        let params = training_params("answers")
            .with(constants::EPOCHS, 3)
            .with(constants::LEARNING_RATE, 0.1)
            .with(constants::LR_DECAY, 0.1)
            .with(constants::DECAY_START_EPOCH, 1);
        let mut trainer = trainer_in(&tmp, params);

        trainer.train(&[answers_batch()]).unwrap();

        assert_abs_diff_eq!(trainer.lr(), 0.01, epsilon = 1e-7);
    }

    #[test]
    fn test_decay_never_compounds() {
        let tmp = TempDir::new().unwrap();
        let params = training_params("answers")
            .with(constants::LEARNING_RATE, 0.1)
            .with(constants::LR_DECAY, 0.1);
        let mut trainer = trainer_in(&tmp, params);

        trainer.decay_learning_rate().unwrap();
        trainer.decay_learning_rate().unwrap();

        // Twice-triggered decay still computes from the stored rate.
        assert_abs_diff_eq!(trainer.lr(), 0.01, epsilon = 1e-7);
    }

    #[test]
    fn test_decay_epoch_beyond_run_never_fires() {
        let tmp = TempDir::new().unwrap();
        let params = training_params("answers")
            .with(constants::LEARNING_RATE, 0.1)
            .with(constants::DECAY_START_EPOCH, 50);
        let mut trainer = trainer_in(&tmp, params);

        trainer.train(&[answers_batch()]).unwrap();

        assert_abs_diff_eq!(trainer.lr(), 0.1, epsilon = 1e-7);
    }

    #[test]
    fn test_zero_epochs_is_a_noop_run() {
        let tmp = TempDir::new().unwrap();
        let params = training_params("answers").with(constants::EPOCHS, 0);
        let mut trainer = trainer_in(&tmp, params);

        let report = trainer.train(&[answers_batch()]).unwrap();

        assert_eq!(report.epochs_completed, 0);
        assert_eq!(report.batches_seen, 0);
        assert_eq!(report.final_loss, 0.0);
        assert!(trainer.history.is_empty());
    }

    #[test]
    fn test_params_store_untouched_by_decay() {
        let tmp = TempDir::new().unwrap();
        let params = training_params("answers")
            .with(constants::LEARNING_RATE, 0.1)
            .with(constants::LR_DECAY, 0.5)
            .with(constants::DECAY_START_EPOCH, 0);
        let expected = params.clone();
        let mut trainer = trainer_in(&tmp, params);

        trainer.train(&[answers_batch()]).unwrap();

        assert_eq!(trainer.params(), &expected);
        assert_abs_diff_eq!(trainer.lr(), 0.05, epsilon = 1e-7);
    }
}
