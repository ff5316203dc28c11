use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use disclink_core::{CacheStore, Config};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::CliError;
use crate::output::OutputFormat;
use crate::output::json::print_json;
use crate::output::text::{format_entries, format_status};
use crate::utils::store::open_cache;

/// Summary printed by `cache status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub path: PathBuf,
    pub generation: Option<DateTime<Utc>>,
    pub expired: bool,
    pub entries: usize,
    pub ttl_hours: u64,
}

pub fn list_entries(config: &Config, format: OutputFormat) -> Result<()> {
    let format = super::require_data_format(format, "cache list")?;
    let cache = open_cache(config)?;
    let entries = cache.entries();

    match format {
        OutputFormat::Json => print_json(&entries)?,
        _ => print!("{}", format_entries(&entries)),
    }
    Ok(())
}

pub fn clear_cache(config: &Config, quiet: bool) -> Result<()> {
    let mut cache = open_cache(config)?;
    let count = cache.entries().len();
    cache.purge().map_err(CliError::from)?;

    if !quiet {
        println!("{} {count} cached discussion entries", "Cleared".green());
    }
    Ok(())
}

pub fn show_status(config: &Config, format: OutputFormat) -> Result<()> {
    let format = super::require_data_format(format, "cache status")?;
    let cache = open_cache(config)?;
    let status = CacheStatus {
        path: cache.store().path().to_path_buf(),
        generation: cache.generation(),
        expired: cache.is_expired(),
        entries: cache.entries().len(),
        ttl_hours: config.cache.ttl_hours,
    };

    match format {
        OutputFormat::Json => print_json(&status)?,
        _ => print!("{}", format_status(&status)),
    }
    Ok(())
}
