//! Mise Command-Line Parser
//!
//! Parses ingredient sentences given as arguments, or one per line on
//! stdin, and prints the structured result as text or JSON.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mise_core::model::{ENGLISH_MODEL, MODEL_PATH_ENV};
use mise_core::{
    CrfTagger, IngredientParser, ModelManager, ParsedIngredient, ParserDebugInfo, ParserOptions,
    SequenceTagger,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "mise")]
#[command(about = "Parse recipe ingredient sentences")]
#[command(version)]
struct Cli {
    /// Sentences to parse; reads one per line from stdin when omitted
    sentences: Vec<String>,

    /// Keep single stop words in text fields
    #[arg(long)]
    keep_stop_words: bool,

    /// Return units as written instead of resolving them
    #[arg(long)]
    string_units: bool,

    /// Resolve cup, pint, quart, gallon and fluid ounce to imperial units
    #[arg(long)]
    imperial_units: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print every parsing stage
    #[arg(long)]
    inspect: bool,

    /// CRF model artifact
    #[arg(short, long, env = MODEL_PATH_ENV)]
    model: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> ParserOptions {
        ParserOptions::new()
            .with_discard_isolated_stop_words(!self.keep_stop_words)
            .with_string_units(self.string_units)
            .with_imperial_units(self.imperial_units)
    }
}

/// Opens the tagger from `path`, or the process-wide English model
/// (bundled unless `MISE_MODEL_PATH` is set).
fn load_tagger(path: Option<PathBuf>) -> Result<Arc<dyn SequenceTagger>> {
    let tagger: Arc<dyn SequenceTagger> = match path {
        Some(path) => {
            let manager: ModelManager<CrfTagger> = ModelManager::new(path);
            manager
                .ensure_ready()
                .with_context(|| format!("Failed to load model {}", manager.source()))?
        }
        None => ENGLISH_MODEL
            .ensure_ready()
            .with_context(|| format!("Failed to load model {}", ENGLISH_MODEL.source()))?,
    };
    Ok(tagger)
}

fn format_parsed(parsed: &ParsedIngredient) -> String {
    let mut out = format!("{}\n", parsed.sentence);
    let mut field = |name: &str, value: String, confidence: f64| {
        out.push_str(&format!("  {name:<12} {value} ({confidence:.2})\n"));
    };

    if let Some(name) = &parsed.name {
        field("name", name.text.clone(), name.confidence);
    }
    if let Some(size) = &parsed.size {
        field("size", size.text.clone(), size.confidence);
    }
    for amount in &parsed.amount {
        field("amount", amount.text.clone(), amount.confidence);
    }
    if let Some(prep) = &parsed.preparation {
        field("preparation", prep.text.clone(), prep.confidence);
    }
    if let Some(purpose) = &parsed.purpose {
        field("purpose", purpose.text.clone(), purpose.confidence);
    }
    if let Some(comment) = &parsed.comment {
        field("comment", comment.text.clone(), comment.confidence);
    }
    out
}

fn format_debug(info: &ParserDebugInfo) -> String {
    let post = &info.postprocessor;
    let mut out = format!("{}\n  cleaned      {}\n", info.sentence, info.preprocessor.cleaned);
    for ((token, label), score) in post.tokens.iter().zip(&post.labels).zip(&post.scores) {
        out.push_str(&format!("  {token:<12} {:<8} {score:.4}\n", label.as_str()));
    }
    out.push_str(&format_parsed(post.parsed()));
    out
}

fn render(parser: &IngredientParser, cli: &Cli, sentence: &str) -> Result<String> {
    let options = cli.options();
    let rendered = if cli.inspect {
        let info = parser.inspect(sentence, &options)?;
        if cli.json {
            serde_json::to_string_pretty(&info)?
        } else {
            format_debug(&info)
        }
    } else {
        let parsed = parser.parse(sentence, &options)?;
        if cli.json {
            serde_json::to_string_pretty(&parsed)?
        } else {
            format_parsed(&parsed)
        }
    };
    Ok(rendered)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let parser = IngredientParser::new(load_tagger(cli.model.clone())?);
    debug!(options = ?cli.options(), "parser ready");

    let sentences = if cli.sentences.is_empty() {
        info!("Reading sentences from stdin");
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read stdin")?
    } else {
        cli.sentences.clone()
    };

    let mut stdout = io::stdout().lock();
    for sentence in sentences.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let rendered = render(&parser, &cli, sentence)
            .with_context(|| format!("Failed to parse {sentence:?}"))?;
        writeln!(stdout, "{rendered}")?;
    }

    Ok(())
}
