//! playtorch-tokenize: Tokenize, encode, or decode text with a BERT vocabulary.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use playtorch_text::cli;
use playtorch_text::load_vocab;
use playtorch_text::tokenizer::{WordPieceConfig, WordPieceTokenizer};
use playtorch_text::{QaConfig, QaPacker, TokenizerError};

#[derive(Parser)]
#[command(
    name = "playtorch-tokenize",
    about = "Tokenize text with a WordPiece vocabulary"
)]
struct Args {
    /// Vocabulary file: vocab.txt or a JSON asset with a "vocab" field.
    /// Defaults to $PLAYTORCH_VOCAB.
    #[arg(short = 'v', long)]
    vocab: Option<PathBuf>,

    /// Text to process
    #[arg(short = 'p', long, conflicts_with_all = ["file", "stdin"])]
    prompt: Option<String>,

    /// Read text from file
    #[arg(short = 'f', long, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long)]
    stdin: bool,

    /// What to produce from the input
    #[arg(long, value_enum, default_value_t = Mode::Ids)]
    mode: Mode,

    /// Keep case when matching against the vocabulary
    #[arg(long)]
    no_lowercase: bool,

    /// Unknown token; must be present in the vocabulary
    #[arg(long, default_value = "[UNK]")]
    unknown_token: String,

    /// Treat the input as a document and pack it with this question
    #[arg(long)]
    question: Option<String>,

    /// Fixed model input length for question packing
    #[arg(long, requires = "question")]
    model_input_length: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,

    /// Print total token count
    #[arg(long)]
    show_count: bool,

    /// Suppress all logging
    #[arg(long)]
    log_disable: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Word pieces
    Tokens,
    /// Token IDs
    Ids,
    /// Decode a list of token IDs back to text
    Decode,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct TokenEntry<'a> {
    id: u32,
    text: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    tokens: Vec<TokenEntry<'a>>,
    count: usize,
}

#[derive(Serialize)]
struct DecodeOutput {
    text: String,
}

fn main() {
    let args = Args::parse();
    cli::init_logging(args.log_disable);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let vocab_path = cli::resolve_vocab_path(args.vocab.as_deref())?;
    let input = cli::read_input(args.prompt.as_deref(), args.file.as_deref(), args.stdin)?;

    let vocab = load_vocab(&vocab_path)?;
    let config = WordPieceConfig {
        unknown_token: args.unknown_token.clone(),
        lowercase: !args.no_lowercase,
        ..WordPieceConfig::default()
    };
    let tokenizer = WordPieceTokenizer::new(&vocab, config)?;

    if args.mode == Mode::Decode {
        if args.question.is_some() {
            return Err(TokenizerError::Config(
                "--question cannot be combined with --mode decode".to_string(),
            )
            .into());
        }
        let ids = cli::parse_token_ids(&input)?;
        let text = tokenizer.decode(&ids);
        match args.output_format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&DecodeOutput { text })?)
            }
            OutputFormat::Text => println!("{}", text),
        }
        return Ok(());
    }

    let ids = match &args.question {
        Some(question) => {
            let qa_config = QaConfig {
                model_input_length: args.model_input_length,
                ..QaConfig::default()
            };
            QaPacker::new(&tokenizer, qa_config)?.pack(question, &input)?
        }
        None => tokenizer.encode(&input),
    };

    match (args.output_format, args.mode) {
        (OutputFormat::Json, _) => {
            let entries: Vec<TokenEntry> = ids
                .iter()
                .map(|&id| TokenEntry {
                    id,
                    text: tokenizer.id_to_token(id),
                })
                .collect();
            let output = JsonOutput {
                count: entries.len(),
                tokens: entries,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        (OutputFormat::Text, Mode::Tokens) => {
            for &id in &ids {
                println!("{}", tokenizer.id_to_token(id));
            }
        }
        (OutputFormat::Text, _) => {
            for &id in &ids {
                println!("{:>5} -> '{}'", id, tokenizer.id_to_token(id));
            }
        }
    }

    if args.show_count && args.output_format == OutputFormat::Text {
        println!("Total number of tokens: {}", ids.len());
    }

    Ok(())
}
