//! kbmark - Markdown import for knowledge-base articles

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use kbmark::{ImportError, ImportFormat, ImportedArticle, extract_metadata, import_file, render};

#[derive(Parser)]
#[command(name = "kbmark")]
#[command(version, about = "Convert Markdown and HTML documents into article HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    kbmark notes.md                Print the rendered HTML
    kbmark page.html -f json       Print title, summary and HTML as JSON
    cat notes.md | kbmark          Render Markdown from stdin")]
struct Cli {
    /// Input file (md, markdown, txt, html, htm); reads Markdown from stdin when omitted
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let article = match &cli.input {
        Some(path) => import_file(path)?,
        None => read_stdin()?,
    };

    match cli.format {
        OutputFormat::Html => Ok(article.html),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&article)?),
    }
}

fn read_stdin() -> Result<ImportedArticle, CliError> {
    let mut markdown = String::new();
    io::stdin()
        .read_to_string(&mut markdown)
        .map_err(CliError::Stdin)?;

    let metadata = extract_metadata(&markdown);
    Ok(ImportedArticle {
        title: metadata.title.unwrap_or_default(),
        summary: metadata.summary,
        html: render(&markdown),
        format: ImportFormat::Markdown,
    })
}
