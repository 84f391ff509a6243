use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Illegal vocabulary: unknown token '{0}' is missing")]
    MissingUnknownToken(String),

    #[error("Illegal vocabulary: special token '{0}' is missing")]
    MissingSpecialToken(String),

    #[error("Question too long: {question_len} tokens do not fit a model input length of {model_input_length}")]
    QuestionTooLong {
        question_len: usize,
        model_input_length: usize,
    },

    #[error("Invalid token id: {0}")]
    InvalidTokenId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
