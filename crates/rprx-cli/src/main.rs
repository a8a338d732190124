//! RPRx CLI - Plan ledger and money leak estimator
//!
//! Usage:
//!   rprx init                          Initialize database
//!   rprx plans add --title T --impact  Save a plan
//!   rprx plans step 3 1                Check off step 1 of plan 3
//!   rprx leaks                         Show the money leak report

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Plans { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(PlansAction::List) => {
                    let estimator = commands::load_estimator(cli.config.as_deref())?;
                    commands::cmd_plans_list(&db, &estimator)
                }
                Some(PlansAction::Add {
                    title,
                    impact,
                    horseman,
                    steps,
                    strategy,
                }) => {
                    let parser = commands::load_parser(cli.config.as_deref())?;
                    commands::cmd_plans_add(
                        &db,
                        &parser,
                        &title,
                        impact.as_deref(),
                        &horseman,
                        &steps,
                        strategy.as_deref(),
                    )
                }
                Some(PlansAction::Import { file }) => commands::cmd_plans_import(&db, &file),
                Some(PlansAction::Step { id, number }) => {
                    commands::cmd_plans_step(&db, id, number)
                }
                Some(PlansAction::Status { id, status }) => {
                    commands::cmd_plans_status(&db, id, &status)
                }
                Some(PlansAction::Focus { id }) => commands::cmd_plans_focus(&db, Some(id)),
                Some(PlansAction::Unfocus) => commands::cmd_plans_focus(&db, None),
                Some(PlansAction::Delete { id }) => commands::cmd_plans_delete(&db, id),
            }
        }
        Commands::Leaks { json } => {
            let db = commands::open_db(&cli.db)?;
            let estimator = commands::load_estimator(cli.config.as_deref())?;
            commands::cmd_leaks(&db, &estimator, json)
        }
        Commands::Impact { text } => {
            let parser = commands::load_parser(cli.config.as_deref())?;
            commands::cmd_impact(&parser, &text)
        }
    }
}
