//! Insight CLI
//!
//! # Commands
//!
//! - `enrich`: Label raw units with zones and write the enriched corpus
//! - `validate`: Check raw units for mandatory keys and write a markdown report
//! - `audit`: Print the zone distribution of the enriched corpus
//! - `build`: Encode the corpus and persist the vector store
//! - `query`: Answer a query, or start an interactive prompt

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use insight_cli::commands;
use tracing_subscriber::{EnvFilter, fmt};

/// Semantic search over an enriched text corpus
#[derive(Parser)]
#[command(name = "insight")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label raw units with zones and write the enriched corpus
    Enrich(commands::EnrichArgs),
    /// Check raw units for mandatory keys and write a markdown report
    Validate(commands::ValidateArgs),
    /// Print the zone distribution of the enriched corpus
    Audit(commands::AuditArgs),
    /// Encode the corpus and persist the vector store
    Build,
    /// Answer a query, or start an interactive prompt when no text is given
    Query(commands::QueryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Enrich(args) => commands::enrich(&config, &args),
        Commands::Validate(args) => commands::validate(&args),
        Commands::Audit(args) => commands::audit(&config, &args).map(|_| ()),
        Commands::Build => commands::build(&config).await,
        Commands::Query(args) => commands::query(&config, &args).await,
    }
}
