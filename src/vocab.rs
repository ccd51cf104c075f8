//! Vocabulary table persisted inside checkpoints

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Token identifier used throughout the crate.
pub type TokenId = u32;

/// Token ↔ id table for the model's output space.
///
/// The trainer treats this as opaque payload: it is written into every
/// checkpoint as a binary blob so a saved model can be decoded later
/// without the original preprocessing pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    token_to_id: HashMap<String, TokenId>,
    id_to_token: HashMap<TokenId, String>,
}

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, returning its id; existing tokens keep their id
    pub fn add(&mut self, token: &str) -> TokenId {
        if let Some(&id) = self.token_to_id.get(token) {
            return id;
        }
        let id = self.token_to_id.len() as TokenId;
        self.token_to_id.insert(token.to_string(), id);
        self.id_to_token.insert(id, token.to_string());
        id
    }

    /// Look up the id for a token
    pub fn id(&self, token: &str) -> Option<TokenId> {
        self.token_to_id.get(token).copied()
    }

    /// Look up the token for an id
    pub fn token(&self, id: TokenId) -> Option<&str> {
        self.id_to_token.get(&id).map(String::as_str)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    /// Check if the vocabulary has no tokens
    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    /// Serialize to a binary file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Deserialize from a binary file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut vocab = Vocabulary::new();
        assert_eq!(vocab.add("the"), 0);
        assert_eq!(vocab.add("battery"), 1);
        assert_eq!(vocab.add("lasts"), 2);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut vocab = Vocabulary::new();
        let first = vocab.add("great");
        let second = vocab.add("great");
        assert_eq!(first, second);
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_lookup_both_ways() {
        let mut vocab = Vocabulary::new();
        let id = vocab.add("charger");
        assert_eq!(vocab.id("charger"), Some(id));
        assert_eq!(vocab.token(id), Some("charger"));
        assert_eq!(vocab.id("missing"), None);
        assert_eq!(vocab.token(999), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut vocab = Vocabulary::new();
        vocab.add("does");
        vocab.add("it");
        vocab.add("work");

        let tmp = NamedTempFile::new().unwrap();
        vocab.save(tmp.path()).unwrap();
        let loaded = Vocabulary::load(tmp.path()).unwrap();
        assert_eq!(loaded, vocab);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Vocabulary::load("/nonexistent/vocab.bin");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
