//! Question-answering input packing and answer extraction.
//!
//! A BERT QA model consumes `[CLS] question [SEP] document [SEP]` as a single
//! id sequence and returns per-position start/end logits. [`QaPacker`] builds
//! that sequence (optionally padded to a fixed model input length) and maps
//! the predicted span back to answer text. Running the model is the caller's
//! job.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::TokenizerError;
use crate::tokenizer::wordpiece::PAD_TOKEN;
use crate::tokenizer::WordPieceTokenizer;

/// Slots taken by `[CLS]` and the two `[SEP]` tokens.
const SPECIAL_SLOTS: usize = 3;

/// Configuration for [`QaPacker`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QaConfig {
    /// Fixed sequence length expected by the model. `None` packs the full
    /// input without truncation or padding.
    pub model_input_length: Option<usize>,
    pub cls_token: String,
    pub sep_token: String,
    pub pad_token: String,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            model_input_length: None,
            cls_token: "[CLS]".to_string(),
            sep_token: "[SEP]".to_string(),
            pad_token: PAD_TOKEN.to_string(),
        }
    }
}

/// Format the raw QA model input.
pub fn format_qa_input(question: &str, document: &str) -> String {
    format!("[CLS] {} [SEP] {} [SEP]", question, document)
}

/// Return the index of the maximum value, or `None` if `values` has no
/// value above negative infinity. Ties resolve to the first index.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best = None;
    let mut best_val = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best = Some(i);
        }
    }
    best
}

/// Packs question/document pairs into model input ids and decodes answers.
pub struct QaPacker<'a> {
    tokenizer: &'a WordPieceTokenizer,
    model_input_length: Option<usize>,
    cls_id: u32,
    sep_id: u32,
    /// Only resolved when a fixed input length is configured.
    pad_id: Option<u32>,
}

impl<'a> QaPacker<'a> {
    /// Resolve the special token ids for `tokenizer`.
    ///
    /// # Errors
    ///
    /// [`TokenizerError::MissingSpecialToken`] if `[CLS]` or `[SEP]` is absent,
    /// or if `[PAD]` is absent while `model_input_length` is set.
    pub fn new(tokenizer: &'a WordPieceTokenizer, config: QaConfig) -> Result<Self, TokenizerError> {
        let lookup = |token: &str| {
            tokenizer
                .special_token_id(token)
                .ok_or_else(|| TokenizerError::MissingSpecialToken(token.to_string()))
        };

        let cls_id = lookup(config.cls_token.as_str())?;
        let sep_id = lookup(config.sep_token.as_str())?;
        let pad_id = match config.model_input_length {
            Some(_) => Some(lookup(config.pad_token.as_str())?),
            None => None,
        };

        Ok(Self {
            tokenizer,
            model_input_length: config.model_input_length,
            cls_id,
            sep_id,
            pad_id,
        })
    }

    /// Encode a question and its source document into model input ids.
    ///
    /// Without a fixed input length this is `encode` of
    /// [`format_qa_input`]. With one, the document is truncated to fit and
    /// the sequence is padded to exactly `model_input_length` ids.
    pub fn pack(&self, question: &str, document: &str) -> Result<Vec<u32>, TokenizerError> {
        let (Some(length), Some(pad_id)) = (self.model_input_length, self.pad_id) else {
            return Ok(self.tokenizer.encode(&format_qa_input(question, document)));
        };

        let question_ids = self.tokenizer.encode(question);
        if question_ids.len() + SPECIAL_SLOTS > length {
            return Err(TokenizerError::QuestionTooLong {
                question_len: question_ids.len(),
                model_input_length: length,
            });
        }

        let mut document_ids = self.tokenizer.encode(document);
        let room = length - question_ids.len() - SPECIAL_SLOTS;
        if document_ids.len() > room {
            warn!(
                document_len = document_ids.len(),
                kept = room,
                "Document truncated to fit model input length"
            );
            document_ids.truncate(room);
        }

        let mut ids = Vec::with_capacity(length);
        ids.push(self.cls_id);
        ids.extend_from_slice(&question_ids);
        ids.push(self.sep_id);
        ids.extend_from_slice(&document_ids);
        ids.push(self.sep_id);
        ids.resize(length, pad_id);

        debug!(
            question_len = question_ids.len(),
            document_len = document_ids.len(),
            length,
            "Packed QA input"
        );

        Ok(ids)
    }

    /// Decode the answer span predicted by the model.
    ///
    /// The span is inclusive, so `start == end` decodes a single token.
    /// Returns `None` when no answer was found: empty logits, an inverted
    /// span, or one past the end of `token_ids`.
    pub fn decode_answer(
        &self,
        token_ids: &[u32],
        start_logits: &[f32],
        end_logits: &[f32],
    ) -> Option<String> {
        let start = argmax(start_logits)?;
        let end = argmax(end_logits)?;

        if start > end || end >= token_ids.len() {
            return None;
        }

        Some(self.tokenizer.decode(&token_ids[start..=end]))
    }
}
