//! WordPiece tokenizer for BERT-family models.
//!
//! Implements the WordPiece subword tokenization algorithm used by BERT:
//!
//! 1. `encode` first runs the [`BasicTokenizer`] (lowercase, never-split,
//!    punctuation splitting) and rejoins its output with single spaces.
//! 2. Each whitespace-delimited word that is already a vocabulary entry is
//!    kept verbatim.
//! 3. Otherwise the word is greedily split into the longest vocabulary
//!    prefix, continuing with the remainder using the `##` prefix.
//! 4. If any position of the word cannot be matched, the whole word becomes
//!    the unknown token.
//!
//! Decoding joins tokens with spaces and fuses `##` pieces back into words.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use super::basic::{is_whitespace, split_words, BasicTokenizer, BasicTokenizerConfig};
use crate::error::TokenizerError;

/// The continuation prefix for WordPiece subwords.
const CONTINUATION_PREFIX: &str = "##";

/// Default unknown token.
pub const UNKNOWN_TOKEN: &str = "[UNK]";

/// Default padding token.
pub const PAD_TOKEN: &str = "[PAD]";

/// Special tokens that are never split by default.
pub const DEFAULT_NEVER_SPLIT: [&str; 5] = ["[UNK]", "[SEP]", "[PAD]", "[CLS]", "[MASK]"];

/// Configuration for [`WordPieceTokenizer`].
///
/// The vocabulary itself is passed to [`WordPieceTokenizer::new`] separately.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordPieceConfig {
    /// Token substituted for words the vocabulary cannot represent.
    /// Must be present in the vocabulary.
    pub unknown_token: String,
    /// Tokens the basic pre-tokenizer passes through unchanged.
    pub never_split: Vec<String>,
    /// Lowercase input before matching.
    pub lowercase: bool,
}

impl Default for WordPieceConfig {
    fn default() -> Self {
        Self {
            unknown_token: UNKNOWN_TOKEN.to_string(),
            never_split: DEFAULT_NEVER_SPLIT.iter().map(|t| t.to_string()).collect(),
            lowercase: true,
        }
    }
}

/// WordPiece tokenizer compatible with BERT vocabularies.
///
/// Immutable after construction; share one instance across callers instead
/// of rebuilding it per request.
#[derive(Debug, Clone)]
pub struct WordPieceTokenizer {
    /// Token string -> token ID lookup.
    vocab: HashMap<String, u32>,
    /// Token ID -> token string (for decoding).
    id_to_token: Vec<String>,
    unknown_token: String,
    unknown_token_id: u32,
    lowercase: bool,
    /// Pre-tokenizer used by `encode`.
    basic: BasicTokenizer,
}

impl WordPieceTokenizer {
    /// Create a tokenizer from newline-delimited vocabulary text.
    ///
    /// The token on line `i` gets ID `i`. If a token appears more than once,
    /// the last occurrence determines its ID.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::MissingUnknownToken`] if the configured
    /// unknown token is not in the vocabulary.
    pub fn new(vocab_text: &str, config: WordPieceConfig) -> Result<Self, TokenizerError> {
        let id_to_token: Vec<String> = vocab_text.split('\n').map(|t| t.to_string()).collect();

        let mut vocab = HashMap::with_capacity(id_to_token.len());
        for (i, tok) in id_to_token.iter().enumerate() {
            vocab.insert(tok.clone(), i as u32);
        }

        let unknown_token_id = *vocab
            .get(&config.unknown_token)
            .ok_or_else(|| TokenizerError::MissingUnknownToken(config.unknown_token.clone()))?;

        debug!(
            vocab_size = id_to_token.len(),
            unknown_token = %config.unknown_token,
            unknown_token_id,
            duplicates = id_to_token.len() - vocab.len(),
            "WordPiece tokenizer initialized"
        );

        let basic = BasicTokenizer::new(BasicTokenizerConfig {
            lowercase: config.lowercase,
            never_split: config.never_split,
        });

        Ok(Self {
            vocab,
            id_to_token,
            unknown_token: config.unknown_token,
            unknown_token_id,
            lowercase: config.lowercase,
            basic,
        })
    }

    /// Create a tokenizer with the default BERT configuration.
    pub fn from_vocab_text(vocab_text: &str) -> Result<Self, TokenizerError> {
        Self::new(vocab_text, WordPieceConfig::default())
    }

    /// Split `text` into vocabulary word pieces.
    ///
    /// Words already in the vocabulary pass through verbatim. This is how
    /// `[CLS]` and `[SEP]` survive. Other words are segmented greedily,
    /// longest match first. Empty or whitespace-only input yields an empty
    /// vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in split_words(text) {
            if self.vocab.contains_key(word) {
                tokens.push(word.to_string());
                continue;
            }

            if self.lowercase {
                self.wordpiece_tokenize(&word.to_lowercase(), &mut tokens);
            } else {
                self.wordpiece_tokenize(word, &mut tokens);
            }
        }

        tokens
    }

    /// Apply WordPiece subword tokenization to a single word.
    ///
    /// All-or-nothing: if some position of the word has no vocabulary match,
    /// the pieces found so far are dropped and a single unknown token is
    /// pushed for the whole word.
    fn wordpiece_tokenize(&self, word: &str, output: &mut Vec<String>) {
        // Byte offset of every char boundary, including the end.
        let bounds: Vec<usize> = word
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(word.len()))
            .collect();
        let n_chars = bounds.len() - 1;

        let mut pieces = Vec::new();
        let mut candidate = String::with_capacity(word.len() + CONTINUATION_PREFIX.len());
        let mut start = 0;

        while start < n_chars {
            let mut end = n_chars;
            let mut found = false;

            while start < end {
                candidate.clear();
                if start > 0 {
                    candidate.push_str(CONTINUATION_PREFIX);
                }
                candidate.push_str(&word[bounds[start]..bounds[end]]);

                if self.vocab.contains_key(candidate.as_str()) {
                    found = true;
                    break;
                }

                end -= 1;
            }

            if !found {
                output.push(self.unknown_token.clone());
                return;
            }

            pieces.push(candidate.clone());
            start = end;
        }

        output.extend(pieces);
    }

    /// Encode raw text into token IDs.
    ///
    /// Runs the basic tokenizer first, so punctuation is split off and
    /// never-split tokens are kept intact. Any token not in the vocabulary
    /// maps to the unknown token ID.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        self.encode_tokens(text)
            .iter()
            .map(|token| self.token_to_id(token))
            .collect()
    }

    /// The word pieces `encode` maps to IDs: basic tokenization, rejoined
    /// with single spaces, then [`tokenize`](Self::tokenize).
    pub fn encode_tokens(&self, text: &str) -> Vec<String> {
        let cleaned = self.basic.tokenize(text).join(" ");
        self.tokenize(&cleaned)
    }

    /// Decode token IDs back into text.
    ///
    /// Unknown IDs decode to the unknown token. `##` continuation markers are
    /// removed together with one preceding whitespace character, fusing word
    /// pieces back into words.
    pub fn decode(&self, ids: &[u32]) -> String {
        let joined = ids
            .iter()
            .map(|&id| self.id_to_token(id))
            .collect::<Vec<_>>()
            .join(" ");
        strip_continuation_markers(&joined)
    }

    /// Look up the ID of `token`, falling back to the unknown token ID.
    pub fn token_to_id(&self, token: &str) -> u32 {
        self.vocab
            .get(token)
            .copied()
            .unwrap_or(self.unknown_token_id)
    }

    /// Look up the token for `id`, falling back to the unknown token.
    pub fn id_to_token(&self, id: u32) -> &str {
        self.id_to_token
            .get(id as usize)
            .map(String::as_str)
            .unwrap_or(self.unknown_token.as_str())
    }

    /// ID of `token` if it is in the vocabulary, without any fallback.
    pub fn special_token_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    /// Whether `token` is a vocabulary entry.
    pub fn contains(&self, token: &str) -> bool {
        self.vocab.contains_key(token)
    }

    pub fn unknown_token(&self) -> &str {
        &self.unknown_token
    }

    pub fn unknown_token_id(&self) -> u32 {
        self.unknown_token_id
    }

    /// Number of vocabulary lines, duplicates included.
    pub fn vocab_size(&self) -> usize {
        self.id_to_token.len()
    }
}

/// Remove every `##` along with at most one whitespace char right before it.
///
/// The whitespace must lie between the previous match and this one, so a
/// char kept before an earlier `##` is never consumed.
fn strip_continuation_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(CONTINUATION_PREFIX) {
        let mut segment = &rest[..pos];
        if let Some(last) = segment.chars().next_back().filter(|&ch| is_whitespace(ch)) {
            segment = &segment[..segment.len() - last.len_utf8()];
        }
        out.push_str(segment);
        rest = &rest[pos + CONTINUATION_PREFIX.len()..];
    }

    out.push_str(rest);
    out
}
