//! berthdb Demo Binary
//!
//! Opens an in-memory store, seeds it with file metadata records and two
//! JSON-field indices, and runs simple read/search/list operations.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use berthdb::{json_field, json_text, Config, Result, Store};

/// Metrics with a registered index; clap rejects anything else
const METRICS: [&str; 2] = ["size", "sha256"];

/// berthdb demo
#[derive(Parser, Debug)]
#[command(name = "berthdb")]
#[command(about = "Embedded transactional key-value store demo")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all keys
    Ls,

    /// Print records whose key contains a term
    Get {
        /// Substring to look for in keys
        term: String,
    },

    /// Print records whose indexed field contains a term
    Search {
        /// Metric to search
        #[arg(value_parser = METRICS)]
        metric: String,

        /// Substring to look for in the field
        term: String,
    },

    /// Print records ordered by an indexed metric
    Order {
        /// Metric to order by
        #[arg(value_parser = METRICS)]
        metric: String,
    },

    /// Print every record with its metadata
    Dump,
}

/// Metadata stored for each seeded file, serialized to JSON
#[derive(Debug, Serialize)]
struct FileMeta {
    size: u64,
    sha256: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,berthdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();

    // Open an in-memory database
    let store = match Store::open_path(Config::MEMORY_PATH) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&store, args.command) {
        tracing::error!("command failed: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = store.close() {
        tracing::error!("failed to close store: {}", e);
        std::process::exit(1);
    }
}

fn run(store: &Store, command: Option<Commands>) -> Result<()> {
    seed(store)?;

    match command {
        Some(Commands::Ls) => list(store),
        Some(Commands::Get { term }) => get(store, &term),
        Some(Commands::Search { metric, term }) => search(store, &metric, &term),
        Some(Commands::Order { metric }) => order_by(store, &metric),
        Some(Commands::Dump) | None => dump(store),
    }
}

/// Seed the store with demo records and register the metric indices
fn seed(store: &Store) -> Result<()> {
    for metric in METRICS {
        store.create_index(metric, "*", json_field(metric))?;
    }

    let records = [
        (
            "/data/avocado.txt",
            FileMeta {
                size: 9,
                sha256: "327bf8231c9572ecdfdc53473319699e7b8e6a98adf0f383ff6be5b46094aba4"
                    .to_string(),
            },
        ),
        (
            "/data/tomato.txt",
            FileMeta {
                size: 8,
                sha256: "3b7721618a86990a3a90f9fa5744d15812954fba6bb21ebf5b5b66ad78cf5816"
                    .to_string(),
            },
        ),
    ];

    store.update(|tx| {
        for (key, meta) in &records {
            let value = serde_json::to_string(meta)?;
            tx.set(key, &value)?;
        }
        Ok(())
    })
}

/// List all keys, one per line
fn list(store: &Store) -> Result<()> {
    store.view(|tx| {
        tx.ascend("", |key, _value| {
            println!("{}", key);
            true
        })
    })
}

/// Print key and metadata for keys containing `term`
fn get(store: &Store, term: &str) -> Result<()> {
    store.view(|tx| {
        tx.ascend("", |key, value| {
            if key.contains(term) {
                println!("{} {}", key, value);
            }
            true
        })
    })
}

/// Print key and field text for records whose `metric` field contains `term`
fn search(store: &Store, metric: &str, term: &str) -> Result<()> {
    store.view(|tx| {
        tx.ascend("", |key, value| {
            if let Some(field) = json_text(value, metric) {
                if field.contains(term) {
                    println!("{} {}", key, field);
                }
            }
            true
        })
    })
}

/// Print all records in the order of the `metric` index
fn order_by(store: &Store, metric: &str) -> Result<()> {
    println!("Order by {}", metric);
    store.view(|tx| {
        tx.ascend(metric, |key, value| {
            println!("{}: {}", key, value);
            true
        })
    })
}

/// Print every record with its metadata
fn dump(store: &Store) -> Result<()> {
    store.view(|tx| {
        tx.ascend("", |key, value| {
            println!("{} {}", key, value);
            true
        })
    })
}
