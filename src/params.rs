//! Hyperparameter store

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants;
use crate::error::{Error, Result};
use crate::variant::ModelVariant;

/// Named hyperparameters for a training run.
///
/// Values are held in a sorted map so the serialized form is key-sorted by
/// construction, and the file written into each checkpoint diffs cleanly
/// across runs. The store is read-only during training: learning-rate decay
/// computes the new rate from the stored value but never writes it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, Value>,
}

impl Params {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store has no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric value for a key
    pub fn get_f64(&self, key: &'static str) -> Result<f64> {
        let value = self.values.get(key).ok_or(Error::MissingParam(key))?;
        value.as_f64().ok_or_else(|| Error::InvalidParam {
            key,
            reason: format!("expected a number, got {value}"),
        })
    }

    /// Unsigned integer value for a key
    pub fn get_usize(&self, key: &'static str) -> Result<usize> {
        let value = self.values.get(key).ok_or(Error::MissingParam(key))?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::InvalidParam {
                key,
                reason: format!("expected an unsigned integer, got {value}"),
            })
    }

    /// String value for a key
    pub fn get_str(&self, key: &'static str) -> Result<&str> {
        let value = self.values.get(key).ok_or(Error::MissingParam(key))?;
        value.as_str().ok_or_else(|| Error::InvalidParam {
            key,
            reason: format!("expected a string, got {value}"),
        })
    }

    /// Configured model variant name
    pub fn model_name(&self) -> Result<&str> {
        self.get_str(constants::MODEL_NAME)
    }

    /// Model variant parsed from `model_name`
    pub fn variant(&self) -> Result<ModelVariant> {
        self.model_name()?.parse()
    }

    /// Number of training epochs
    pub fn epochs(&self) -> Result<usize> {
        self.get_usize(constants::EPOCHS)
    }

    /// Configured learning rate
    pub fn learning_rate(&self) -> Result<f32> {
        Ok(self.get_f64(constants::LEARNING_RATE)? as f32)
    }

    /// Multiplicative decay factor for the learning rate
    pub fn lr_decay(&self) -> Result<f32> {
        Ok(self.get_f64(constants::LR_DECAY)? as f32)
    }

    /// Epoch index at which the decayed rate is installed
    pub fn decay_start_epoch(&self) -> Result<usize> {
        self.get_usize(constants::DECAY_START_EPOCH)
    }

    /// Per-batch probability of teacher forcing
    pub fn teacher_forcing_ratio(&self) -> Result<f64> {
        self.get_f64(constants::TEACHER_FORCING_RATIO)
    }

    /// Validate everything the training loop reads.
    ///
    /// Checks:
    /// - `model_name` names a supported variant
    /// - `epochs` and `decay_start_epoch` are unsigned integers
    /// - `learning_rate` and `lr_decay` are positive
    /// - `teacher_forcing_ratio` is in `[0.0, 1.0]`
    pub fn validate_for_training(&self) -> Result<()> {
        self.variant()?;
        self.epochs()?;
        self.decay_start_epoch()?;

        let lr = self.get_f64(constants::LEARNING_RATE)?;
        if lr <= 0.0 {
            return Err(Error::InvalidParam {
                key: constants::LEARNING_RATE,
                reason: format!("{lr} (must be > 0.0)"),
            });
        }

        let decay = self.get_f64(constants::LR_DECAY)?;
        if decay <= 0.0 {
            return Err(Error::InvalidParam {
                key: constants::LR_DECAY,
                reason: format!("{decay} (must be > 0.0)"),
            });
        }

        let ratio = self.get_f64(constants::TEACHER_FORCING_RATIO)?;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidParam {
                key: constants::TEACHER_FORCING_RATIO,
                reason: format!("{ratio} (must be in [0.0, 1.0])"),
            });
        }

        Ok(())
    }

    /// Serialize as key-sorted JSON with 4-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Write the store to a file as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Read a store back from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::Serialization(e.to_string()))
    }
}
