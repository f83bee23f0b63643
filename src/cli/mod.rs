//! Command-line interface
//!
//! Clap command structures and handlers. The CLI is a thin driver over the
//! cache store; all semantics live in the domain and infrastructure layers.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlstash")]
#[command(about = "Keyed, expiring cache backed by a relational table", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database URL override (e.g. sqlite:sqlstash.db)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Cache table override
    #[arg(long, global = true)]
    pub table: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a value under a key
    Save {
        /// Cache key
        key: String,

        /// Value to store; parsed as JSON, falling back to a plain string
        value: String,

        /// Time-to-live in seconds (0 = never expires)
        #[arg(short, long, default_value = "0")]
        ttl: u64,
    },

    /// Look up a single key
    Fetch {
        /// Cache key
        key: String,
    },

    /// Look up several keys in one batched statement
    FetchMany {
        /// Cache keys
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Check whether a key exists and is not expired
    Contains {
        /// Cache key
        key: String,
    },

    /// Remove a key
    Delete {
        /// Cache key
        key: String,
    },

    /// Unconditionally remove every entry in the cache table
    Flush,

    /// Show backend statistics
    Stats,
}
