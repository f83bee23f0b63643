//! CLI argument parsing tests.

use clap::Parser;
use sqlstash::cli::{Cli, Commands};

#[test]
fn test_parse_save_with_ttl() {
    let cli = Cli::parse_from(["sqlstash", "save", "user:1", "{\"name\": \"jerry\"}", "--ttl", "100"]);
    match cli.command {
        Commands::Save { key, value, ttl } => {
            assert_eq!(key, "user:1");
            assert_eq!(value, "{\"name\": \"jerry\"}");
            assert_eq!(ttl, 100);
        }
        _ => panic!("expected save command"),
    }
}

#[test]
fn test_parse_save_defaults_to_no_expiry() {
    let cli = Cli::parse_from(["sqlstash", "save", "k", "v"]);
    match cli.command {
        Commands::Save { ttl, .. } => assert_eq!(ttl, 0),
        _ => panic!("expected save command"),
    }
}

#[test]
fn test_parse_fetch_many_keys() {
    let cli = Cli::parse_from(["sqlstash", "fetch-many", "a", "b", "c"]);
    match cli.command {
        Commands::FetchMany { keys } => assert_eq!(keys, vec!["a", "b", "c"]),
        _ => panic!("expected fetch-many command"),
    }
}

#[test]
fn test_fetch_many_requires_at_least_one_key() {
    let result = Cli::try_parse_from(["sqlstash", "fetch-many"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags() {
    let cli = Cli::parse_from([
        "sqlstash",
        "fetch",
        "k",
        "--json",
        "--database",
        "sqlite::memory:",
        "--table",
        "other_cache",
    ]);
    assert!(cli.json);
    assert_eq!(cli.database.as_deref(), Some("sqlite::memory:"));
    assert_eq!(cli.table.as_deref(), Some("other_cache"));
    assert!(matches!(cli.command, Commands::Fetch { .. }));
}

#[test]
fn test_flush_takes_no_arguments() {
    let cli = Cli::parse_from(["sqlstash", "flush"]);
    assert!(matches!(cli.command, Commands::Flush));

    let result = Cli::try_parse_from(["sqlstash", "flush", "extra"]);
    assert!(result.is_err());
}
