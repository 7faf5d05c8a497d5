//! Eco Bloom CLI - catalog and backup tools over a directory-backed store.
//!
//! # Usage
//!
//! ```bash
//! # Create the store and seed the demo catalog on first run
//! ecobloom seed
//!
//! # List products, optionally filtered and sorted
//! ecobloom list --search coconut --category all --sort price-low
//!
//! # Dashboard figures
//! ecobloom stats
//!
//! # Write a backup (defaults to ecobloom-backup-YYYY-MM-DD.json)
//! ecobloom export --output backups/
//!
//! # Restore a backup (needs ECOBLOOM_ADMIN_USERNAME / ECOBLOOM_ADMIN_PASSWORD)
//! ecobloom import backups/ecobloom-backup-2024-05-01.json
//! ```
//!
//! # Commands
//!
//! - `seed` - Load the storefront catalog, seeding demo products if empty
//! - `list` - Run a catalog query
//! - `stats` - Show dashboard figures
//! - `export` - Write a backup document
//! - `import` - Restore a backup document

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ecobloom")]
#[command(author, version, about = "Eco Bloom catalog tools")]
struct Cli {
    /// Store directory (overrides `ECOBLOOM_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog, seeding the demo products on first run
    Seed,
    /// List products
    List {
        /// Free-text search over name and description
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category ID, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,

        /// `price-low`, `price-high`, `rating` or `newest`
        #[arg(long, default_value = "newest")]
        sort: String,
    },
    /// Show dashboard figures
    Stats,
    /// Export the catalog to a backup file
    Export {
        /// Output file, or a directory to place the default file name in
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore the catalog from a backup file
    Import {
        /// Backup file to read
        file: PathBuf,
    },
}

fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN")
        .ok()
        .filter(|dsn| !dsn.trim().is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "ecobloom=info,ecobloom_catalog=info,ecobloom_storefront=info,ecobloom_admin=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli.data_dir;
    match cli.command {
        Commands::Seed => commands::storefront::seed(data_dir)?,
        Commands::List {
            search,
            category,
            sort,
        } => commands::storefront::list(data_dir, &search, &category, &sort)?,
        Commands::Stats => commands::admin::stats(data_dir)?,
        Commands::Export { output } => commands::admin::export(data_dir, output).await?,
        Commands::Import { file } => commands::admin::import(data_dir, &file).await?,
    }
    Ok(())
}
