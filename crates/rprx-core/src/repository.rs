//! Plan repository seam
//!
//! The estimator works on plans that are already loaded. Anything that can
//! hand them over implements [`PlanRepository`]; [`crate::db::Database`] is the
//! bundled SQLite implementation.

use tracing::{debug, warn};

use crate::error::Result;
use crate::leaks::{LeakEstimator, LeakResult};
use crate::models::Plan;

/// Read access to saved plans
pub trait PlanRepository {
    /// All saved plans, oldest first
    fn list_plans(&self) -> Result<Vec<Plan>>;

    fn get_plan(&self, id: i64) -> Result<Option<Plan>>;

    /// The plan the user is currently focused on, if any
    fn focused_plan_id(&self) -> Result<Option<i64>>;
}

/// Load plans from `repo` and aggregate them
pub fn estimate_from_repository<R: PlanRepository + ?Sized>(
    repo: &R,
    estimator: &LeakEstimator,
) -> Result<LeakResult> {
    let plans = repo.list_plans()?;

    let focused = match repo.focused_plan_id()? {
        Some(id) => match plans.iter().find(|p| p.id == id) {
            Some(plan) => Some(plan.clone()),
            None => {
                let plan = repo.get_plan(id)?;
                if plan.is_none() {
                    warn!(plan_id = id, "Focused plan no longer exists");
                }
                plan
            }
        },
        None => None,
    };

    debug!(
        plans = plans.len(),
        focused = ?focused.as_ref().map(|p| p.id),
        "Estimating money leaks"
    );

    Ok(estimator.compute(&plans, focused.as_ref()))
}
