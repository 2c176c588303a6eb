//! Command line front end: run one search or inspect the archive listing
//! without starting the server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pastehunt_client::{ListingInspector, SearchService};
use pastehunt_core::{AppConfig, Hit, MatchKind, SearchMode, SourceKind};

#[derive(Parser)]
#[command(name = "pastehunt")]
#[command(about = "Search recent and indexed pastes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for pastes mentioning a query
    Search {
        query: String,

        /// fast, balanced or deep
        #[arg(long, default_value = "balanced")]
        mode: SearchMode,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the first entries of the archive listing
    Archive {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct HitRow<'a> {
    paste_id: &'a str,
    link: &'a str,
    snippet: &'a str,
    kind: MatchKind,
    source: SourceKind,
}

impl<'a> From<&'a Hit> for HitRow<'a> {
    fn from(hit: &'a Hit) -> Self {
        Self { paste_id: hit.id.as_str(), link: &hit.link, snippet: &hit.snippet, kind: hit.kind, source: hit.source }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let parts = SearchService::from_config(&config)?;

    match cli.command {
        Commands::Search { query, mode, json } => {
            let result = parts.service.search(&query, mode).await?;

            if json {
                let rows: Vec<HitRow<'_>> = result.hits.iter().map(HitRow::from).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!("{} hits for {:?} ({})", result.count(), result.query, result.mode);
            for hit in &result.hits {
                println!("\n[{}] {} ({:?}, {})", hit.id, hit.link, hit.kind, hit.source);
                println!("    {}", hit.snippet);
            }
        }
        Commands::Archive { json } => {
            let snapshot = parts.archive.snapshot().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            for (label, entries) in [("Archive", &snapshot.archive), ("Public", &snapshot.public)] {
                println!("{label} ({})", entries.len());
                for entry in entries {
                    println!("  {}  {}", entry.id, entry.title);
                }
            }
        }
    }

    Ok(())
}
