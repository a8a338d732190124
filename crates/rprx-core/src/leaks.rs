//! Money leak estimator
//!
//! Aggregates saved plans into a financial-impact summary:
//! - Grand totals of the low/high impact range and the amount already recovered
//! - The same quantities split across the four horsemen
//! - A ranking of the plans with the largest potential impact
//! - Progress of the user's focused plan
//!
//! The estimator is a pure function of its arguments. Loading plans is the
//! job of a [`crate::repository::PlanRepository`].
//!
//! ## Recovered value
//!
//! A completed plan recovers its midpoint `(low + high) / 2`. A plan with some
//! steps checked off recovers the same fraction of its midpoint. A plan whose
//! labels name no known horseman still counts toward the grand totals but is
//! reported under `uncategorized` rather than in any horseman bucket.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults::EstimatorDefaults;
use crate::horseman::{normalize_labels, Horseman, UNKNOWN_LABEL};
use crate::models::{ImpactRange, Plan, PlanStatus};

/// Rounded dollar amounts for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakTotals {
    pub low: i64,
    pub high: i64,
    pub recovered: i64,
}

/// Totals for each horseman
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorsemanBreakdown {
    pub interest: LeakTotals,
    pub taxes: LeakTotals,
    pub insurance: LeakTotals,
    pub education: LeakTotals,
}

impl HorsemanBreakdown {
    pub fn get(&self, horseman: Horseman) -> &LeakTotals {
        match horseman {
            Horseman::Interest => &self.interest,
            Horseman::Taxes => &self.taxes,
            Horseman::Insurance => &self.insurance,
            Horseman::Education => &self.education,
        }
    }

    fn get_mut(&mut self, horseman: Horseman) -> &mut LeakTotals {
        match horseman {
            Horseman::Interest => &mut self.interest,
            Horseman::Taxes => &mut self.taxes,
            Horseman::Insurance => &mut self.insurance,
            Horseman::Education => &mut self.education,
        }
    }
}

/// One plan as it appears in the top leaks ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakSummary {
    pub id: i64,
    pub title: String,
    /// Recognized horsemen, or `["unknown"]`
    pub horsemen: Vec<String>,
    pub estimated_impact_low: f64,
    pub estimated_impact_high: f64,
    /// Completion state derived from the stored status and the checklist
    pub status: PlanStatus,
    pub completed_steps: usize,
    pub total_steps: usize,
}

/// Aggregate financial impact of a set of plans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakResult {
    pub total_low: i64,
    pub total_high: i64,
    pub total_recovered: i64,
    pub by_horseman: HorsemanBreakdown,
    /// Plans with no recognized horseman (included in the totals above)
    pub uncategorized: LeakTotals,
    pub top_leaks: Vec<LeakSummary>,
    /// Recovered amount as a share of the total midpoint (0-100)
    pub percent_recovered: u32,
    /// Checklist progress of the focused plan (0-100)
    pub focused_plan_progress: u32,
    pub plan_count: usize,
    pub completed_count: usize,
    pub in_progress_count: usize,
}

/// Unrounded running sums
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    low: f64,
    high: f64,
    recovered: f64,
}

impl Accumulator {
    fn add(&mut self, low: f64, high: f64, recovered: f64) {
        self.low += low;
        self.high += high;
        self.recovered += recovered;
    }

    fn rounded(&self) -> LeakTotals {
        LeakTotals {
            low: round_dollars(self.low),
            high: round_dollars(self.high),
            recovered: round_dollars(self.recovered),
        }
    }
}

/// Computes [`LeakResult`]s using a defaults table
#[derive(Debug, Clone, Default)]
pub struct LeakEstimator {
    defaults: EstimatorDefaults,
}

impl LeakEstimator {
    pub fn new(defaults: EstimatorDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &EstimatorDefaults {
        &self.defaults
    }

    /// Impact range for a plan, falling back to the default range when the
    /// stored one is missing or unusable
    pub fn resolve_impact(&self, plan: &Plan) -> ImpactRange {
        match plan.content.estimated_impact {
            Some(range) if range.is_valid() => range,
            Some(range) => {
                debug!(
                    plan_id = plan.id,
                    low = range.low,
                    high = range.high,
                    "Malformed impact range, using default"
                );
                self.defaults.default_impact
            }
            None => self.defaults.default_impact,
        }
    }

    /// Aggregate `plans`; `focused` drives `focused_plan_progress`
    pub fn compute(&self, plans: &[Plan], focused: Option<&Plan>) -> LeakResult {
        let mut totals = Accumulator::default();
        let mut buckets = [Accumulator::default(); 4];
        let mut uncategorized = Accumulator::default();
        let mut summaries = Vec::with_capacity(plans.len());
        let mut completed_count = 0;
        let mut in_progress_count = 0;

        for plan in plans {
            let range = self.resolve_impact(plan);
            let midpoint = range.midpoint();

            let total_steps = plan.content.steps.len();
            let done = plan.content.completed_step_count();
            if done != plan.content.completed_steps.len() {
                debug!(
                    plan_id = plan.id,
                    listed = plan.content.completed_steps.len(),
                    counted = done,
                    "Ignoring duplicate or out-of-range completed steps"
                );
            }

            let status = completion_state(plan.status, done, total_steps);
            let recovered = match status {
                PlanStatus::Completed => midpoint,
                PlanStatus::InProgress if total_steps > 0 => {
                    midpoint * (done as f64 / total_steps as f64)
                }
                _ => 0.0,
            };
            match status {
                PlanStatus::Completed => completed_count += 1,
                PlanStatus::InProgress => in_progress_count += 1,
                PlanStatus::NotStarted => {}
            }

            totals.add(range.low, range.high, recovered);

            let horsemen = normalize_labels(&plan.content.horseman);
            if horsemen.is_empty() {
                uncategorized.add(range.low, range.high, recovered);
            } else {
                let share = horsemen.len() as f64;
                for h in &horsemen {
                    buckets[bucket_index(*h)].add(
                        range.low / share,
                        range.high / share,
                        recovered / share,
                    );
                }
            }

            let labels = if horsemen.is_empty() {
                vec![UNKNOWN_LABEL.to_string()]
            } else {
                horsemen.iter().map(|h| h.as_str().to_string()).collect()
            };

            summaries.push(LeakSummary {
                id: plan.id,
                title: plan.title.clone(),
                horsemen: labels,
                estimated_impact_low: range.low,
                estimated_impact_high: range.high,
                status,
                completed_steps: done,
                total_steps,
            });
        }

        let total_midpoint = (totals.low + totals.high) / 2.0;
        let percent_recovered = percent(totals.recovered, total_midpoint);

        let focused_plan_progress = focused
            .map(|plan| {
                percent(
                    plan.content.completed_step_count() as f64,
                    plan.content.steps.len() as f64,
                )
            })
            .unwrap_or(0);

        // Stable sort keeps input order among equal impacts
        summaries.sort_by(|a, b| {
            b.estimated_impact_high
                .partial_cmp(&a.estimated_impact_high)
                .unwrap_or(Ordering::Equal)
        });
        summaries.truncate(self.defaults.top_leak_count);

        let mut by_horseman = HorsemanBreakdown::default();
        for h in Horseman::all() {
            *by_horseman.get_mut(*h) = buckets[bucket_index(*h)].rounded();
        }

        let rounded = totals.rounded();
        LeakResult {
            total_low: rounded.low,
            total_high: rounded.high,
            total_recovered: rounded.recovered,
            by_horseman,
            uncategorized: uncategorized.rounded(),
            top_leaks: summaries,
            percent_recovered,
            focused_plan_progress,
            plan_count: plans.len(),
            completed_count,
            in_progress_count,
        }
    }
}

/// Aggregate `plans` with the built-in defaults
pub fn compute(plans: &[Plan], focused: Option<&Plan>) -> LeakResult {
    LeakEstimator::default().compute(plans, focused)
}

/// Completion state from the stored status and the checklist.
///
/// A plan with no steps can only be completed through its stored status.
pub fn completion_state(stored: PlanStatus, done: usize, total_steps: usize) -> PlanStatus {
    if stored == PlanStatus::Completed || (total_steps > 0 && done == total_steps) {
        PlanStatus::Completed
    } else if done > 0 {
        PlanStatus::InProgress
    } else {
        PlanStatus::NotStarted
    }
}

fn bucket_index(horseman: Horseman) -> usize {
    match horseman {
        Horseman::Interest => 0,
        Horseman::Taxes => 1,
        Horseman::Insurance => 2,
        Horseman::Education => 3,
    }
}

/// Integer percentage, 0 when the denominator is 0
fn percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 || !whole.is_finite() {
        return 0;
    }
    (100.0 * part / whole).round().clamp(0.0, u32::MAX as f64) as u32
}

fn round_dollars(value: f64) -> i64 {
    value.round() as i64
}
