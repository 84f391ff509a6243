pub mod cli;
pub mod error;
pub mod qa;
pub mod tokenizer;
pub mod vocab;

pub use error::TokenizerError;
pub use qa::{QaConfig, QaPacker};
pub use tokenizer::{BasicTokenizer, WordPieceTokenizer};
pub use vocab::{load_vocab, VocabAsset};
