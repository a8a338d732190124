//! Plan ledger command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use rprx_core::horseman::HorsemanLabel;
use rprx_core::models::{NewPlan, PlanContent, PlanStatus};
use rprx_core::{Database, ImpactParser, LeakEstimator};

use super::truncate;

fn status_icon(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::NotStarted => "⬜",
        PlanStatus::InProgress => "🔄",
        PlanStatus::Completed => "✅",
    }
}

pub fn cmd_plans_list(db: &Database, estimator: &LeakEstimator) -> Result<()> {
    let plans = db.list_plans()?;

    if plans.is_empty() {
        println!("No plans saved yet. Run:");
        println!("  rprx plans add --title \"Refinance\" --impact '$500-$3,000'");
        return Ok(());
    }

    println!();
    println!("📋 Saved Plans");
    println!("   ─────────────────────────────────────────────────────────────");

    for plan in plans {
        let range = estimator.resolve_impact(&plan);
        let focus = if plan.is_focused { "🎯" } else { "  " };

        println!(
            "   {} {} #{:<4} {:32} │ ${:>6.0} - ${:<7.0} │ {}/{} steps",
            status_icon(plan.status),
            focus,
            plan.id,
            truncate(&plan.title, 32),
            range.low,
            range.high,
            plan.content.completed_step_count(),
            plan.content.steps.len(),
        );
    }

    Ok(())
}

pub fn cmd_plans_add(
    db: &Database,
    parser: &ImpactParser,
    title: &str,
    impact: Option<&str>,
    horseman: &[String],
    steps: &[String],
    strategy: Option<&str>,
) -> Result<()> {
    for label in horseman {
        if let HorsemanLabel::Unrecognized(raw) = HorsemanLabel::parse(label) {
            println!(
                "   ⚠️  '{}' is not a horseman (interest, taxes, insurance, education)",
                raw
            );
        }
    }

    let estimated_impact = impact.map(|text| parser.parse(Some(text)));

    let plan = NewPlan {
        title: title.to_string(),
        status: PlanStatus::NotStarted,
        content: PlanContent {
            estimated_impact,
            steps: steps.to_vec(),
            completed_steps: Vec::new(),
            horseman: horseman.to_vec(),
            strategy_id: strategy.map(str::to_string),
            impact_text: impact.map(str::to_string),
        },
    };

    let id = db.create_plan(&plan).context("Failed to save plan")?;

    println!("✅ Saved plan #{}: {}", id, title.trim());
    if let Some(range) = estimated_impact {
        println!(
            "   Estimated impact: ${:.0} - ${:.0} per year",
            range.low, range.high
        );
    }
    Ok(())
}

pub fn cmd_plans_import(db: &Database, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let plans: Vec<NewPlan> =
        serde_json::from_str(&content).context("Expected a JSON array of plans")?;

    let count = db.import_plans(&plans)?;
    println!("📥 Imported {} plans from {}", count, file.display());
    Ok(())
}

pub fn cmd_plans_step(db: &Database, id: i64, number: usize) -> Result<()> {
    if number == 0 {
        bail!("Step numbers start at 1");
    }

    let plan = db.toggle_step(id, number - 1)?;
    let checked = plan.content.completed_step_indices().contains(&(number - 1));
    let step = plan
        .content
        .steps
        .get(number - 1)
        .map(String::as_str)
        .unwrap_or_default();

    println!(
        "{} Step {} {}: {}",
        if checked { "☑️ " } else { "⬜" },
        number,
        if checked { "checked" } else { "unchecked" },
        step
    );
    println!(
        "   {} is {} ({}/{} steps)",
        plan.title,
        plan.status,
        plan.content.completed_step_count(),
        plan.content.steps.len()
    );
    Ok(())
}

pub fn cmd_plans_status(db: &Database, id: i64, status: &str) -> Result<()> {
    let status: PlanStatus = status.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    db.set_plan_status(id, status)?;
    println!("{} Plan #{} is now {}", status_icon(status), id, status);
    Ok(())
}

pub fn cmd_plans_focus(db: &Database, id: Option<i64>) -> Result<()> {
    db.set_focused_plan(id)?;
    match id {
        Some(id) => println!("🎯 Plan #{} is now your focus", id),
        None => println!("Focus cleared"),
    }
    Ok(())
}

pub fn cmd_plans_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_plan(id)?;
    println!("🗑️  Deleted plan #{}", id);
    Ok(())
}
