use std::path::Path;

use serde::Serialize;
use shepherd_core::{
    Config, Database, KvStore, ProgressTracker, StaticCatalog, SystemClock, TrackerOptions,
};
use tracing::debug;

pub mod config;
pub mod goal;
pub mod library;
pub mod progress;
pub mod rescue;
pub mod settings;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type CliTracker = ProgressTracker<Database, SystemClock, StaticCatalog>;

fn load_catalog(config: &Config) -> Result<StaticCatalog, Box<dyn std::error::Error>> {
    match config.catalog.path.as_deref() {
        Some(path) if !path.is_empty() => Ok(StaticCatalog::from_json_file(Path::new(path))?),
        _ => Ok(StaticCatalog::default()),
    }
}

/// Tracker over the on-disk database, with the daily rollover applied.
pub fn open_tracker() -> Result<CliTracker, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    debug!(quotes = catalog.quotes().len(), "catalog loaded");
    let db = Database::open()?;
    Ok(ProgressTracker::open(
        db,
        SystemClock,
        catalog,
        TrackerOptions::from(&config),
    ))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn wipe() -> CliResult {
    let db = Database::open()?;
    db.clear()?;
    println!("all data wiped");
    Ok(())
}
