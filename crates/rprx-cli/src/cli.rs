//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// RPRx - Track financial plans and the money they recover
#[derive(Parser)]
#[command(name = "rprx")]
#[command(about = "Plan ledger and money leak estimator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "rprx.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Estimator defaults file
    ///
    /// Overrides ~/.local/share/rprx/config/defaults.toml. Keys not set in
    /// the file keep their built-in values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage saved plans
    Plans {
        #[command(subcommand)]
        action: Option<PlansAction>,
    },

    /// Show the money leak report
    Leaks {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a free-text impact description into an annual range
    Impact {
        /// Description such as "$500-$3,000" or "$1,200/month"
        text: String,
    },
}

#[derive(Subcommand)]
pub enum PlansAction {
    /// List saved plans (default)
    List,

    /// Save a new plan
    Add {
        /// Plan title
        #[arg(short, long)]
        title: String,

        /// Estimated impact, e.g. "$500-$3,000" (estimator default if omitted)
        #[arg(short, long)]
        impact: Option<String>,

        /// Horseman label (interest, taxes, insurance, education); repeatable
        #[arg(long = "horseman")]
        horseman: Vec<String>,

        /// Checklist step; repeatable, in order
        #[arg(short, long = "step")]
        steps: Vec<String>,

        /// Strategy this plan implements
        #[arg(long)]
        strategy: Option<String>,
    },

    /// Import plans from a JSON array
    Import {
        /// JSON file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check or uncheck a step
    Step {
        /// Plan ID
        id: i64,

        /// Step number (starting at 1)
        number: usize,
    },

    /// Set a plan's status (not_started, in_progress, completed)
    Status {
        /// Plan ID
        id: i64,

        /// New status
        status: String,
    },

    /// Make a plan the focused plan
    Focus {
        /// Plan ID
        id: i64,
    },

    /// Clear the focused plan
    Unfocus,

    /// Delete a plan
    Delete {
        /// Plan ID
        id: i64,
    },
}
