//! Decode Text Example
//!
//! Streams per-example predictions out of a toy batched translation
//! pipeline and repairs unknown-token placeholders via attention alignment.
//!
//! ```bash
//! # Translate the built-in sample sentences
//! cargo run -p decode-text
//!
//! # Translate a file, one sentence per line, with a replacement lexicon
//! cargo run -p decode-text -- --input sentences.txt --unk-mapping lexicon.tsv
//! ```

mod model;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;

use decant::{TokenMapping, resolve_unknown_tokens, stream_predictions};

use crate::model::ToyTranslationSource;

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode text - streams and repairs toy translations")]
struct Args {
    /// Input file with one source sentence per line. Uses built-in sample
    /// sentences when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Two-column tab-separated file remapping chosen source tokens.
    #[arg(long)]
    unk_mapping: Option<PathBuf>,

    /// Batch size used by the toy pipeline.
    #[arg(long, default_value_t = 32)]
    batch_size: usize,

    /// Enable debug logging.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let sentences = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading input file {}", path.display()))?
            .lines()
            .map(str::to_string)
            .filter(|line| !line.trim().is_empty())
            .collect(),
        None => sample_sentences(),
    };

    let mapping = match &args.unk_mapping {
        Some(path) => Some(
            TokenMapping::from_file(path)
                .with_context(|| format!("loading unk mapping {}", path.display()))?,
        ),
        None => None,
    };

    let source = ToyTranslationSource::new(sentences, args.batch_size);
    let mut stream = stream_predictions(source);

    let mut index = 0usize;
    while let Some(item) = stream.next().await {
        let mut record = item.context("streaming predictions")?;

        let source_tokens = record
            .take("source_tokens")
            .and_then(|v| v.into_tokens())
            .context("record is missing source_tokens")?;
        let predicted_tokens = record
            .take("predicted_tokens")
            .and_then(|v| v.into_tokens())
            .context("record is missing predicted_tokens")?;
        let attention_scores = record
            .take("attention_scores")
            .and_then(|v| v.into_scores())
            .context("record is missing attention_scores")?;

        let resolved = resolve_unknown_tokens(
            &source_tokens,
            &predicted_tokens,
            &attention_scores,
            mapping.as_ref(),
        )?;

        println!("{index}\t{}\t{}", source_tokens.join(" "), resolved.join(" "));
        index += 1;
    }

    tracing::debug!(records = index, "stream exhausted");
    Ok(())
}

fn sample_sentences() -> Vec<String> {
    [
        "the cat sat on a mat",
        "the dog is great",
        "paris is great in spring",
    ]
    .map(str::to_string)
    .to_vec()
}
