//! Vocabulary asset loading.
//!
//! A vocabulary ships either as a plain `vocab.txt` (one token per line) or as
//! a JSON asset of the form `{"vocab": "[PAD]\n[UNK]\n..."}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TokenizerError;

/// JSON vocabulary asset with the newline-delimited vocabulary in `vocab`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabAsset {
    pub vocab: String,
}

impl VocabAsset {
    /// Parse a JSON vocabulary asset.
    pub fn from_json(json: &str) -> Result<Self, TokenizerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read the vocabulary text from a file.
///
/// Files with a `.json` extension (any case) are parsed as [`VocabAsset`];
/// anything else is returned as-is.
pub fn load_vocab(path: impl AsRef<Path>) -> Result<String, TokenizerError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let vocab = if is_json {
        VocabAsset::from_json(&contents)?.vocab
    } else {
        contents
    };

    info!(
        path = %path.display(),
        entries = vocab.split('\n').count(),
        "Loaded vocabulary"
    );

    Ok(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let asset = VocabAsset::from_json(r#"{"vocab": "[UNK]\nhello\nworld"}"#).unwrap();
        assert_eq!(asset.vocab, "[UNK]\nhello\nworld");
    }

    #[test]
    fn test_from_json_missing_field() {
        let err = VocabAsset::from_json(r#"{"words": []}"#).unwrap_err();
        assert!(matches!(err, TokenizerError::Json(_)), "got: {:?}", err);
    }

    #[test]
    fn test_load_vocab_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        fs::write(&path, "[UNK]\nhello\n").unwrap();

        assert_eq!(load_vocab(&path).unwrap(), "[UNK]\nhello\n");
    }

    #[test]
    fn test_load_vocab_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.JSON");
        let asset = VocabAsset {
            vocab: "[PAD]\n[UNK]\nrunn\n##ing".to_string(),
        };
        fs::write(&path, serde_json::to_string(&asset).unwrap()).unwrap();

        assert_eq!(load_vocab(&path).unwrap(), asset.vocab);
    }

    #[test]
    fn test_load_vocab_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, "[UNK]\nhello").unwrap();

        assert!(matches!(load_vocab(&path), Err(TokenizerError::Json(_))));
    }

    #[test]
    fn test_load_vocab_missing_file() {
        let err = load_vocab("/nonexistent/vocab.txt").unwrap_err();
        assert!(matches!(err, TokenizerError::Io(_)), "got: {:?}", err);
    }

    #[test]
    fn test_loaded_vocab_builds_tokenizer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, r#"{"vocab": "[UNK]\nrunn\n##ing"}"#).unwrap();

        let vocab = load_vocab(&path).unwrap();
        let tok = crate::WordPieceTokenizer::from_vocab_text(&vocab).unwrap();
        assert_eq!(tok.encode("Running"), vec![1, 2]);
    }
}
