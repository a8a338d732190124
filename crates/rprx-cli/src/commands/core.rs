//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_estimator` / `load_parser` - Build services from the defaults table
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use rprx_core::{Database, EstimatorDefaults, ImpactParser, LeakEstimator};
use tracing::debug;

/// Open the plan database, creating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Load the defaults table from `--config`, the data dir override, or the built-in table
pub fn load_defaults(config: Option<&Path>) -> Result<EstimatorDefaults> {
    let defaults = EstimatorDefaults::load(config).context("Failed to load estimator defaults")?;
    debug!(?defaults, "Loaded estimator defaults");
    Ok(defaults)
}

pub fn load_estimator(config: Option<&Path>) -> Result<LeakEstimator> {
    Ok(LeakEstimator::new(load_defaults(config)?))
}

pub fn load_parser(config: Option<&Path>) -> Result<ImpactParser> {
    ImpactParser::new(load_defaults(config)?).context("Failed to build impact parser")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let existing = db.list_plans()?.len();
    if existing > 0 {
        println!("   Found {} existing plans", existing);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Save a plan: rprx plans add --title \"Refinance\" --impact '$500-$3,000'");
    println!("  2. See your leaks: rprx leaks");

    Ok(())
}
