//! Basic tokenizer: whitespace and punctuation splitting.
//!
//! Cleans raw text before WordPiece segmentation:
//!
//! 1. Splits on runs of whitespace.
//! 2. Passes never-split tokens (`[CLS]`, `[SEP]`, ...) through verbatim.
//! 3. Lowercases everything else, if enabled.
//! 4. Emits every ASCII punctuation character as its own token.

use std::collections::HashSet;

use serde::Deserialize;

/// Configuration for [`BasicTokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicTokenizerConfig {
    /// Lowercase words before splitting. Never-split tokens are exempt.
    pub lowercase: bool,
    /// Tokens emitted unchanged, without lowercasing or punctuation splitting.
    pub never_split: Vec<String>,
}

impl Default for BasicTokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            never_split: Vec::new(),
        }
    }
}

/// Splits text into words and single-character punctuation tokens.
#[derive(Debug, Clone)]
pub struct BasicTokenizer {
    lowercase: bool,
    never_split: HashSet<String>,
}

impl BasicTokenizer {
    pub fn new(config: BasicTokenizerConfig) -> Self {
        Self {
            lowercase: config.lowercase,
            never_split: config.never_split.into_iter().collect(),
        }
    }

    /// Whether words are lowercased before splitting.
    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    /// Whether `token` is protected from lowercasing and splitting.
    pub fn is_never_split(&self, token: &str) -> bool {
        self.never_split.contains(token)
    }

    /// Tokenize `text` into words and punctuation.
    ///
    /// Empty or whitespace-only input yields an empty vector.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in split_words(text) {
            if self.never_split.contains(word) {
                tokens.push(word.to_string());
                continue;
            }

            if self.lowercase {
                split_on_punctuation(&word.to_lowercase(), &mut tokens);
            } else {
                split_on_punctuation(word, &mut tokens);
            }
        }

        tokens
    }
}

impl Default for BasicTokenizer {
    fn default() -> Self {
        Self::new(BasicTokenizerConfig::default())
    }
}

/// Whitespace as matched by the `\s` class of the original tokenizer:
/// Unicode `White_Space` plus the byte order mark, minus NEL (U+0085).
pub(crate) fn is_whitespace(ch: char) -> bool {
    (ch.is_whitespace() && ch != '\u{0085}') || ch == '\u{FEFF}'
}

/// Split `text` on runs of [`is_whitespace`], skipping empty words.
pub(crate) fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_whitespace).filter(|word| !word.is_empty())
}

/// Push each punctuation char of `word` as its own token, and each maximal run
/// of non-punctuation chars as one token.
fn split_on_punctuation(word: &str, output: &mut Vec<String>) {
    let mut run_start = None;

    for (i, ch) in word.char_indices() {
        if is_punctuation(ch) {
            if let Some(start) = run_start.take() {
                output.push(word[start..i].to_string());
            }
            output.push(ch.to_string());
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }

    if let Some(start) = run_start {
        output.push(word[start..].to_string());
    }
}

/// Check if a character is one of the fixed ASCII punctuation characters.
///
/// Non-ASCII characters are never treated as punctuation.
pub(crate) fn is_punctuation(ch: char) -> bool {
    let cp = ch as u32;
    (0x21..=0x2F).contains(&cp)       // ! " # $ % & ' ( ) * + , - . /
        || (0x3A..=0x40).contains(&cp) // : ; < = > ? @
        || (0x5B..=0x60).contains(&cp) // [ \ ] ^ _ `
        || (0x7B..=0x7E).contains(&cp) // { | } ~
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_specials(lowercase: bool) -> BasicTokenizer {
        BasicTokenizer::new(BasicTokenizerConfig {
            lowercase,
            never_split: vec!["[CLS]".to_string(), "[SEP]".to_string()],
        })
    }

    #[test]
    fn test_empty_input() {
        let tok = BasicTokenizer::default();
        assert!(tok.tokenize("").is_empty());
        assert!(tok.tokenize("   ").is_empty());
        assert!(tok.tokenize("\t\n \r\n").is_empty());
    }

    #[test]
    fn test_splits_contraction_and_trailing_period() {
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("don't."), vec!["don", "'", "t", "."]);
    }

    #[test]
    fn test_lowercases_by_default() {
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("Hello WORLD"), vec!["hello", "world"]);
    }

    #[test]
    fn test_never_split_with_question_and_context() {
        let tok = with_specials(true);
        let input = "[CLS] What did I order? [SEP] I ordered a big burger, French fries, \
                     and soda at table 20. I made that order at 3 p.m. [SEP]";
        let expected = vec![
            "[CLS]", "what", "did", "i", "order", "?", "[SEP]", "i", "ordered", "a", "big",
            "burger", ",", "french", "fries", ",", "and", "soda", "at", "table", "20", ".",
            "i", "made", "that", "order", "at", "3", "p", ".", "m", ".", "[SEP]",
        ];
        assert_eq!(tok.tokenize(input), expected);
    }

    #[test]
    fn test_lowercase_disabled_keeps_case() {
        let tok = with_specials(false);
        let input = "[CLS] What did I order? [SEP] I ordered a big burger... [SEP]";
        let expected = vec![
            "[CLS]", "What", "did", "I", "order", "?", "[SEP]", "I", "ordered", "a", "big",
            "burger", ".", ".", ".", "[SEP]",
        ];
        assert_eq!(tok.tokenize(input), expected);
    }

    #[test]
    fn test_never_split_preserved_regardless_of_lowercase() {
        for lowercase in [true, false] {
            let tok = BasicTokenizer::new(BasicTokenizerConfig {
                lowercase,
                never_split: vec!["[MASK]".to_string(), "Foo.Bar".to_string()],
            });
            assert_eq!(tok.tokenize("[MASK]"), vec!["[MASK]"]);
            assert_eq!(tok.tokenize("Foo.Bar"), vec!["Foo.Bar"]);
        }
    }

    #[test]
    fn test_never_split_requires_exact_word() {
        // "[CLS]," is not in the set, so it is lowercased and split.
        let tok = with_specials(true);
        assert_eq!(tok.tokenize("[CLS],"), vec!["[", "cls", "]", ","]);
    }

    #[test]
    fn test_without_never_split_brackets_are_split() {
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("[SEP]"), vec!["[", "sep", "]"]);
    }

    #[test]
    fn test_all_punctuation() {
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("!@#$"), vec!["!", "@", "#", "$"]);
    }

    #[test]
    fn test_non_ascii_is_not_punctuation() {
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("caf\u{00C9}\u{3001}x"), vec!["caf\u{00E9}\u{3001}x"]);
    }

    #[test]
    fn test_is_punctuation_full_set() {
        let set = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
        for ch in set.chars() {
            assert!(is_punctuation(ch), "expected punctuation: {:?}", ch);
        }
        for ch in ['a', 'Z', '0', '9', ' ', '\u{00BF}', '\u{2014}'] {
            assert!(!is_punctuation(ch), "unexpected punctuation: {:?}", ch);
        }
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("\u{FEFF}Hello\u{FEFF}world"), vec!["hello", "world"]);
        assert!(tok.tokenize("\u{FEFF}").is_empty());
    }

    #[test]
    fn test_next_line_is_not_whitespace() {
        assert!(!is_whitespace('\u{0085}'));
        let tok = BasicTokenizer::default();
        assert_eq!(tok.tokenize("a\u{0085}b c"), vec!["a\u{0085}b", "c"]);
    }

    #[test]
    fn test_split_words() {
        let words: Vec<&str> = split_words(" \tone\u{3000}two\r\n\u{2028}three ").collect();
        assert_eq!(words, vec!["one", "two", "three"]);
        assert_eq!(split_words("").count(), 0);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: BasicTokenizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BasicTokenizerConfig::default());

        let config: BasicTokenizerConfig =
            serde_json::from_str(r#"{"lowercase": false, "neverSplit": ["[CLS]"]}"#).unwrap();
        assert!(!config.lowercase);
        assert_eq!(config.never_split, vec!["[CLS]"]);
    }
}
