//! Dex CLI
//!
//! Browse the creature catalog from the terminal, with responses cached
//! between runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use futures::future::join_all;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dex_cache::BackendKind;
use dex_client::{CatalogClient, ClientConfig};
use dex_core::constants::DEFAULT_PAGE_LIMIT;
use dex_core::types::{capitalize, Creature};

/// Dex - creature catalog browser
#[derive(Parser)]
#[command(name = "dex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Cache backend: memory, session, or persistent
    #[arg(long, global = true, env = "DEX_CACHE_BACKEND", default_value = "persistent")]
    backend: BackendKind,

    /// Maximum number of cached responses
    #[arg(long, global = true, env = "DEX_CACHE_CAPACITY")]
    capacity: Option<usize>,

    /// Directory for the persistent cache
    #[arg(long, global = true, env = "DEX_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Catalog API root
    #[arg(long, global = true, env = "DEX_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List creatures page by page
    List {
        /// Entries per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
        /// Index of the first entry
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
        /// Number of pages to walk
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
        /// Fetch full details for every entry
        #[arg(short, long)]
        details: bool,
    },

    /// Show a creature by name or id
    Show {
        /// Creature name or catalog id
        query: String,
    },

    /// Inspect the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print cache statistics and stored keys
    Stats,
    /// Remove every cached response
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "dex=debug,info"
    } else {
        "dex=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = build_client(&cli)?;

    match cli.command {
        Commands::List {
            limit,
            offset,
            pages,
            details,
        } => cmd_list(&client, limit, offset, pages, details).await,
        Commands::Show { query } => cmd_show(&client, &query).await,
        Commands::Cache { action } => match action {
            CacheAction::Stats => cmd_cache_stats(&client),
            CacheAction::Clear => cmd_cache_clear(&client),
        },
    }
}

fn build_client(cli: &Cli) -> Result<CatalogClient> {
    let mut config = ClientConfig::from_env()
        .context("Invalid DEX_* environment configuration")?
        .with_cache_backend(cli.backend);

    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(capacity) = cli.capacity {
        config = config.with_cache_capacity(capacity);
    }
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }

    debug!(?config, "Building catalog client");
    CatalogClient::new(config).context("Failed to set up catalog client")
}

/// Walk list pages, optionally loading details for each entry
async fn cmd_list(
    client: &CatalogClient,
    limit: u32,
    offset: u32,
    pages: usize,
    details: bool,
) -> Result<()> {
    println!("{}", "📖 Listing creatures...".cyan().bold());

    let mut next = Some(client.first_page_url(limit, offset)?);
    for page_number in 1..=pages {
        let Some(url) = next.take() else {
            break;
        };

        let page = client
            .fetch_list(&url)
            .await
            .with_context(|| format!("Failed to fetch page {}", page_number))?;

        println!(
            "\n{} {} {}",
            "Page".yellow().bold(),
            page_number,
            format!("({} creatures in catalog)", page.count).dimmed()
        );

        if details {
            // Entries load concurrently; a URL listed twice is only fetched once
            let results = join_all(page.results.iter().map(|entry| client.fetch_details(&entry.url))).await;
            for (entry, result) in page.results.iter().zip(results) {
                match result {
                    Ok(creature) => print_creature(&creature),
                    Err(e) if e.is_busy() => {
                        println!("   {} {}", capitalize(&entry.name), "(already loading)".dimmed())
                    }
                    Err(e) => println!("   {} {}", capitalize(&entry.name), format!("({})", e).red()),
                }
            }
        } else {
            for entry in &page.results {
                let creature = Creature::from(entry);
                println!("   • {}", capitalize(&creature.name));
            }
        }

        next = page.next;
    }

    if next.is_none() {
        println!("\n{}", "End of catalog.".dimmed());
    }

    Ok(())
}

/// Look a creature up by name or id
async fn cmd_show(client: &CatalogClient, query: &str) -> Result<()> {
    println!("{} {}", "🔍 Searching:".cyan().bold(), query);

    let creature = client
        .search(query)
        .await
        .with_context(|| format!("No creature found for '{}'", query.trim()))?;

    println!();
    print_creature(&creature);
    Ok(())
}

fn cmd_cache_stats(client: &CatalogClient) -> Result<()> {
    let cache = client.cache();
    let stats = cache.stats();

    println!("{}", "📦 Response cache".cyan().bold());
    println!("   {} {}", "Name:".dimmed(), cache.name());
    println!("   {} {}", "Backend:".dimmed(), cache.kind());
    println!("   {} {}/{}", "Entries:".dimmed(), stats.entries, stats.capacity);

    let keys = cache.keys();
    if !keys.is_empty() {
        println!("\n{}", "Most recently used first:".yellow());
        for key in keys {
            println!("   • {}", key);
        }
    }

    Ok(())
}

fn cmd_cache_clear(client: &CatalogClient) -> Result<()> {
    let cleared = client.cache().len();
    client.cache().clear();
    println!("{} {} entries", "✅ Cleared".green(), cleared);
    Ok(())
}

fn print_creature(creature: &Creature) {
    let id = creature.id.map(|id| format!("#{:03}", id)).unwrap_or_default();
    println!("   {} {}", capitalize(&creature.name).bold(), id.dimmed());

    if !creature.types.is_empty() {
        println!("   {} {}", "Types:".dimmed(), creature.types.join(", "));
    }
    println!("   {} {}", "Moves:".dimmed(), creature.moves.len());
    for image in &creature.images {
        println!("   {} {}", format!("{}:", image.description).dimmed(), image.url);
    }
}
