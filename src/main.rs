//! Sqlstash CLI entry point.

use clap::Parser;

use sqlstash::cli::{commands, Cli, Commands};
use sqlstash::infrastructure::config::ConfigLoader;
use sqlstash::infrastructure::database::{DatabaseConnection, SqlCacheStore};
use sqlstash::infrastructure::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(url) = cli.database {
        config.database.url = url;
    }
    if let Some(table) = cli.table {
        config.cache.table = table;
    }
    ConfigLoader::validate(&config)?;

    let _guard = logging::init(&config.logging)?;

    let db = DatabaseConnection::new(&config.database.url, config.database.max_connections).await?;
    let store = SqlCacheStore::new(db.pool().clone(), config.cache.table.clone())?;
    store.ensure_table().await?;

    let result = match cli.command {
        Commands::Save { key, value, ttl } => {
            commands::save(&store, &key, value, ttl, cli.json).await
        }
        Commands::Fetch { key } => commands::fetch(&store, &key, cli.json).await,
        Commands::FetchMany { keys } => commands::fetch_many(&store, &keys, cli.json).await,
        Commands::Contains { key } => commands::contains(&store, &key, cli.json).await,
        Commands::Delete { key } => commands::delete(&store, &key, cli.json).await,
        Commands::Flush => commands::flush(&store, cli.json).await,
        Commands::Stats => commands::stats(&store, cli.json).await,
    };

    db.close().await;
    result
}
