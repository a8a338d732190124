//! Money leak report command

use anyhow::Result;
use rprx_core::{estimate_from_repository, Database, Horseman, LeakEstimator, LeakResult};

use super::{format_dollars, progress_bar, truncate};

pub fn cmd_leaks(db: &Database, estimator: &LeakEstimator, json: bool) -> Result<()> {
    let result = estimate_from_repository(db, estimator)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_report(&result);
    Ok(())
}

fn print_report(result: &LeakResult) {
    if result.plan_count == 0 {
        println!("No plans saved yet. Add one with: rprx plans add --title ...");
        return;
    }

    println!();
    println!("💸 Money Leaks");
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Estimated impact:  {} - {} per year",
        format_dollars(result.total_low),
        format_dollars(result.total_high)
    );
    println!(
        "   Recovered so far:  {} ({}%)",
        format_dollars(result.total_recovered),
        result.percent_recovered
    );
    println!(
        "   {} {}%",
        progress_bar(result.percent_recovered, 30),
        result.percent_recovered
    );
    println!(
        "   Plans: {} total, {} in progress, {} completed",
        result.plan_count, result.in_progress_count, result.completed_count
    );

    println!();
    println!("🐎 By Horseman");
    for h in Horseman::all() {
        let totals = result.by_horseman.get(*h);
        println!(
            "   {:10} {:>9} - {:<9} recovered {}",
            h.as_str(),
            format_dollars(totals.low),
            format_dollars(totals.high),
            format_dollars(totals.recovered)
        );
    }
    if result.uncategorized.high > 0 {
        println!(
            "   {:10} {:>9} - {:<9} recovered {}",
            "other",
            format_dollars(result.uncategorized.low),
            format_dollars(result.uncategorized.high),
            format_dollars(result.uncategorized.recovered)
        );
    }

    println!();
    println!("🔝 Top Leaks");
    for (rank, leak) in result.top_leaks.iter().enumerate() {
        println!(
            "   {}. {:30} │ ${:.0} - ${:.0} │ {} │ {}/{} steps",
            rank + 1,
            truncate(&leak.title, 30),
            leak.estimated_impact_low,
            leak.estimated_impact_high,
            leak.horsemen.join(", "),
            leak.completed_steps,
            leak.total_steps
        );
    }

    println!();
    println!(
        "🎯 Focused plan: {} {}%",
        progress_bar(result.focused_plan_progress, 20),
        result.focused_plan_progress
    );
}
