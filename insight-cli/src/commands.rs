//! Command handlers for the `insight` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use insight_rag::{
    Config, QueryEngine, StoreBuilder, ZoneClassifier, ZoneStats, enrich_dir, load_corpus,
    provider_from_config, validate_dir,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use crate::render::format_result;

/// Load the configuration file, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Arguments for `insight enrich`.
#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// Directory of raw JSON units
    #[arg(long, default_value = "data/chunks")]
    pub input: PathBuf,

    /// Output directory (defaults to the configured corpus directory)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Label every unit with its zone and print the zone distribution.
pub fn enrich(config: &Config, args: &EnrichArgs) -> Result<()> {
    let output = args.output.as_deref().unwrap_or(&config.corpus.dir);
    let classifier = ZoneClassifier::from_config(&config.zones);
    let summary = enrich_dir(&args.input, output, &classifier)
        .with_context(|| format!("enriching {}", args.input.display()))?;

    println!("Enriched {} files into {}", summary.files, output.display());
    print!("{}", summary.zones);
    Ok(())
}

/// Arguments for `insight validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Directory of raw JSON units
    #[arg(long, default_value = "data/chunks")]
    pub dir: PathBuf,

    /// Where to write the markdown report
    #[arg(long, default_value = "validation_report.md")]
    pub report: PathBuf,
}

/// Check every unit for its mandatory keys and write a markdown report.
pub fn validate(args: &ValidateArgs) -> Result<()> {
    let report = validate_dir(&args.dir)?;
    fs::write(&args.report, report.to_markdown(Utc::now()))
        .with_context(|| format!("writing report to {}", args.report.display()))?;

    println!(
        "Validated {} units in {} files: {} valid, {} issues",
        report.units,
        report.files,
        report.valid_units,
        report.issues.len()
    );
    println!("Report written to {}", args.report.display());
    Ok(())
}

/// Arguments for `insight audit`.
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Corpus directory (defaults to the configured corpus directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Print how many records fall in each zone.
pub fn audit(config: &Config, args: &AuditArgs) -> Result<ZoneStats> {
    let dir = args.dir.as_deref().unwrap_or(&config.corpus.dir);
    let corpus = load_corpus(dir)?;
    let stats = ZoneStats::from_records(&corpus.records);

    println!("Zone distribution for {} ({} records)", dir.display(), stats.total());
    print!("{stats}");
    Ok(stats)
}

/// Encode the configured corpus and persist the vector store.
pub async fn build(config: &Config) -> Result<()> {
    let corpus = load_corpus(&config.corpus.dir)?;
    let provider = provider_from_config(&config.embedding)?;
    let store = StoreBuilder::new(provider)
        .build_and_persist(&corpus.records, &config.store.path)
        .await?;

    println!(
        "Stored {} vectors ({}d, model {}) at {}",
        store.len(),
        store.dimensions(),
        store.model(),
        config.store.path.display()
    );
    Ok(())
}

/// Arguments for `insight query`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Query text; starts an interactive prompt when omitted
    pub text: Option<String>,

    /// Number of results to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Answer one query, or serve an interactive prompt until EOF.
pub async fn query(config: &Config, args: &QueryArgs) -> Result<()> {
    let provider = provider_from_config(&config.embedding)?;
    let engine = QueryEngine::open(config, provider).await?;

    match &args.text {
        Some(text) => {
            let result = engine.query(text, args.top_k).await?;
            print!("{}", format_result(&result));
            Ok(())
        }
        None => repl(&engine, args.top_k).await,
    }
}

async fn repl(engine: &QueryEngine, top_k: Option<usize>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Enter a query (Ctrl-D or 'exit' to quit).");

    loop {
        let line = match editor.readline("query> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }
        editor.add_history_entry(text)?;

        match engine.query(text, top_k).await {
            Ok(result) => println!("{}", format_result(&result)),
            Err(e) => {
                warn!(error = %e, "query failed");
                eprintln!("Error: {e}");
            }
        }
    }

    info!("interactive session ended");
    Ok(())
}
