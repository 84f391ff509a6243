//! Shared utilities for the `playtorch-tokenize` binary.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::TokenizerError;

/// Environment variable holding the default vocabulary path.
pub const VOCAB_ENV: &str = "PLAYTORCH_VOCAB";

/// Initialize tracing/logging to stderr.
///
/// If `disable` is true, no output is produced.
/// Otherwise respects `RUST_LOG` env var, defaulting to WARN.
pub fn init_logging(disable: bool) {
    use tracing_subscriber::EnvFilter;

    if disable {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the vocabulary path from `--vocab`, falling back to `PLAYTORCH_VOCAB`.
pub fn resolve_vocab_path(arg: Option<&Path>) -> Result<PathBuf, TokenizerError> {
    resolve_vocab_path_with(arg, std::env::var_os(VOCAB_ENV).map(PathBuf::from))
}

fn resolve_vocab_path_with(
    arg: Option<&Path>,
    env_value: Option<PathBuf>,
) -> Result<PathBuf, TokenizerError> {
    let path = arg
        .map(Path::to_path_buf)
        .or(env_value.filter(|p| !p.as_os_str().is_empty()))
        .ok_or_else(|| {
            TokenizerError::Config(format!(
                "No vocabulary provided. Use --vocab or set {}",
                VOCAB_ENV
            ))
        })?;

    if !path.exists() {
        return Err(TokenizerError::Config(format!(
            "Vocabulary file not found: {}",
            path.display()
        )));
    }

    Ok(path)
}

/// Read input text from one of: prompt string, file path, or stdin.
pub fn read_input(
    prompt: Option<&str>,
    file: Option<&Path>,
    use_stdin: bool,
) -> Result<String, TokenizerError> {
    if let Some(text) = prompt {
        return Ok(text.to_string());
    }

    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }

    if use_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    Err(TokenizerError::Config(
        "No input provided. Use --prompt, --file, or --stdin".to_string(),
    ))
}

/// Parse a list of token ids such as `7 4 5`, `7,4,5` or `[7, 4, 5]`.
pub fn parse_token_ids(input: &str) -> Result<Vec<u32>, TokenizerError> {
    input
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| TokenizerError::InvalidTokenId(s.to_string()))
        })
        .collect()
}
