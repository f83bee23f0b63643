//! CLI command implementations.

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::cli::output;
use crate::domain::ports::CacheStore;
use crate::infrastructure::database::SqlCacheStore;

/// Parse a value operand: JSON when it parses, a plain string otherwise.
///
/// Lets `sqlstash save user '{"name": "jerry"}'` and
/// `sqlstash save greeting hello` both do the obvious thing.
fn parse_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

pub async fn save(
    store: &SqlCacheStore,
    key: &str,
    raw: String,
    ttl: u64,
    json_mode: bool,
) -> Result<()> {
    let value = parse_value(raw);
    store
        .save(key, &value, ttl)
        .await
        .context("Failed to save cache entry")?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({"saved": key, "ttl": ttl}))?
        );
    } else if ttl > 0 {
        println!("Saved {key} (expires in {ttl}s)");
    } else {
        println!("Saved {key}");
    }
    Ok(())
}

pub async fn fetch(store: &SqlCacheStore, key: &str, json_mode: bool) -> Result<()> {
    let value = store
        .fetch(key)
        .await
        .context("Failed to fetch cache entry")?;

    match value {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None if json_mode => println!("null"),
        None => println!("(miss)"),
    }
    Ok(())
}

pub async fn fetch_many(store: &SqlCacheStore, keys: &[String], json_mode: bool) -> Result<()> {
    let results = store
        .fetch_multiple(keys)
        .await
        .context("Failed to fetch cache entries")?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", output::format_entries(&results, keys));
    }
    Ok(())
}

pub async fn contains(store: &SqlCacheStore, key: &str, json_mode: bool) -> Result<()> {
    let present = store
        .contains(key)
        .await
        .context("Failed to check cache entry")?;

    if json_mode {
        println!("{}", json!({"key": key, "contains": present}));
    } else {
        println!("{present}");
    }
    Ok(())
}

pub async fn delete(store: &SqlCacheStore, key: &str, json_mode: bool) -> Result<()> {
    store
        .delete(key)
        .await
        .context("Failed to delete cache entry")?;

    if json_mode {
        println!("{}", json!({"deleted": key}));
    } else {
        println!("Deleted {key}");
    }
    Ok(())
}

pub async fn flush(store: &SqlCacheStore, json_mode: bool) -> Result<()> {
    store.flush().await.context("Failed to flush cache")?;

    if json_mode {
        println!("{}", json!({"flushed": true}));
    } else {
        println!("Cache flushed");
    }
    Ok(())
}

pub async fn stats(store: &SqlCacheStore, json_mode: bool) -> Result<()> {
    let stats = store.stats().await;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", output::format_stats(&stats));
    }
    Ok(())
}
