//! Timestamped checkpoint persistence

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use safetensors::tensor::{Dtype, TensorView};

use crate::constants;
use crate::error::{Error, Result};
use crate::params::Params;
use crate::tensor::Tensor;
use crate::vocab::Vocabulary;

/// Writes training checkpoints under `<base_dir>/<model_name>/<timestamp>/`.
///
/// Each checkpoint holds three artifacts: the weight snapshot
/// (`model.safetensors`), the hyperparameters as sorted, indented JSON
/// (`params.json`), and the vocabulary blob (`vocab.bin`). Directories are
/// created on demand; saving twice with the same timestamp overwrites in
/// place. There is no temp-file-then-rename protocol, so a crash mid-write
/// can leave a partial checkpoint.
#[derive(Debug, Clone)]
pub struct CheckpointWriter {
    base_dir: PathBuf,
    model_name: String,
}

impl CheckpointWriter {
    /// Create a writer rooted at `base_dir` for the named model
    pub fn new(base_dir: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            model_name: model_name.into(),
        }
    }

    /// Directory a checkpoint taken at `time` lands in
    pub fn checkpoint_dir(&self, time: DateTime<Utc>) -> PathBuf {
        self.base_dir
            .join(&self.model_name)
            .join(time.format(constants::TIMESTAMP_FORMAT).to_string())
    }

    /// Write all three artifacts, stamped with the current time
    pub fn save(
        &self,
        state: &[(String, Tensor)],
        params: &Params,
        vocab: &Vocabulary,
    ) -> Result<PathBuf> {
        self.save_at(Utc::now(), state, params, vocab)
    }

    /// Write all three artifacts into the directory for `time`
    pub fn save_at(
        &self,
        time: DateTime<Utc>,
        state: &[(String, Tensor)],
        params: &Params,
        vocab: &Vocabulary,
    ) -> Result<PathBuf> {
        let dir = self.checkpoint_dir(time);
        std::fs::create_dir_all(&dir)?;

        self.write_weights(&dir.join(constants::WEIGHTS_FILE), state)?;
        params.save(dir.join(constants::PARAMS_FILE))?;
        vocab.save(dir.join(constants::VOCAB_FILE))?;

        Ok(dir)
    }

    fn write_weights(&self, path: &Path, state: &[(String, Tensor)]) -> Result<()> {
        // Flat f32 tensors; shape is the element count
        let tensor_data: Vec<(String, Vec<u8>, Vec<usize>)> = state
            .iter()
            .map(|(name, tensor)| {
                let values = tensor.to_vec();
                let bytes: Vec<u8> = bytemuck::cast_slice(&values).to_vec();
                (name.clone(), bytes, vec![tensor.len()])
            })
            .collect();

        let views: Vec<(&str, TensorView<'_>)> = tensor_data
            .iter()
            .map(|(name, bytes, shape)| {
                let view = TensorView::new(Dtype::F32, shape.clone(), bytes).map_err(|e| {
                    Error::Serialization(format!("tensor view for {name}: {e}"))
                })?;
                Ok((name.as_str(), view))
            })
            .collect::<Result<_>>()?;

        let mut metadata = HashMap::new();
        metadata.insert("model_name".to_string(), self.model_name.clone());

        let safetensor_bytes = safetensors::serialize(views, Some(metadata))
            .map_err(|e| Error::Serialization(format!("weights serialization failed: {e}")))?;
        std::fs::write(path, safetensor_bytes)?;

        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    proptest! {
        // The checkpoint directory is always base/name/<19-char stamp>.
        #[test]
        fn checkpoint_dir_layout_is_stable(
            name in "[a-z][a-z_]{0,15}",
            secs in 0_i64..4_000_000_000,
        ) {
            let time = Utc.timestamp_opt(secs, 0).unwrap();
            let writer = CheckpointWriter::new("/tmp/base", name.clone());
            let dir = writer.checkpoint_dir(time);

            let stamp = dir.file_name().unwrap().to_str().unwrap().to_string();
            prop_assert_eq!(stamp.len(), 19);
            prop_assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '-'));
            prop_assert_eq!(dir.parent().unwrap().file_name().unwrap().to_str().unwrap(), name.as_str());
            prop_assert!(dir.starts_with("/tmp/base"));
        }
    }
}
