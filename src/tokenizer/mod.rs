//! Text tokenizers.
//!
//! [`BasicTokenizer`] does whitespace/punctuation cleanup and
//! [`WordPieceTokenizer`] maps the result onto a BERT vocabulary.

pub mod basic;
pub mod wordpiece;

pub use basic::{BasicTokenizer, BasicTokenizerConfig};
pub use wordpiece::{WordPieceConfig, WordPieceTokenizer};
