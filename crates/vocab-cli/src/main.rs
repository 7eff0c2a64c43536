//! vocab-resolve CLI
//!
//! Loads the RDF produced by the UML-to-RDF conversion, resolves it into
//! per-entity documentation records for one language, and writes them out
//! for downstream generators (documentation, JSON-LD context, SHACL).

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use vocab_graph::TripleStore;
use vocab_resolver::{Resolver, ResolverConfig};

mod writers;

use writers::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "vocab-resolve")]
#[command(author, version, about = "Resolve an RDF vocabulary graph into documentation records")]
struct Cli {
    /// Input graph (.ttl, .nt, .nq, .trig, .rdf/.owl/.xml)
    input: PathBuf,

    /// JSON configuration file (language, document, vocabulary IRIs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language tag to resolve literals for (overrides config)
    #[arg(short, long)]
    language: Option<String>,

    /// Base URI of the published document (overrides config)
    #[arg(long)]
    base_uri: Option<String>,

    /// Document identifier (overrides config)
    #[arg(long)]
    document_id: Option<String>,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Exit non-zero when error-level diagnostics were reported
    #[arg(long)]
    deny_errors: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn resolver_config(&self) -> Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ResolverConfig::default(),
        };
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(base_uri) = &self.base_uri {
            config.document.base_uri = base_uri.clone();
        }
        if let Some(document_id) = &self.document_id {
            config.document.document_id = document_id.clone();
        }
        if self.jobs.is_some() {
            config.parallelism = self.jobs;
        }
        if config.language.is_empty() {
            return Err(anyhow!("no language given: pass --language or set it in --config"));
        }
        Ok(config)
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    let config = cli.resolver_config()?;

    let store = TripleStore::from_path(&cli.input)
        .with_context(|| format!("failed to load graph {}", cli.input.display()))?;
    tracing::info!(input = %cli.input.display(), triples = store.len(), "graph loaded");

    let resolver = Resolver::new(store, config)?;
    let output = resolver.run()?;

    let writer = cli.format.writer();
    match &cli.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            writer.write(&output, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writer.write(&output, &mut out)?;
            out.flush()?;
        }
    }

    Ok(!(cli.deny_errors && output.has_errors()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::error!("error-level diagnostics reported (--deny-errors)");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
