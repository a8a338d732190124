//! RPRx Core Library
//!
//! Shared functionality for the RPRx plan ledger:
//! - Plan models and the horseman categories
//! - Money leak estimator (impact totals, recovered value, top leaks)
//! - Impact string parser for free-text savings estimates
//! - Estimator defaults table with override files
//! - Plan repository seam and the SQLite plan store

pub mod db;
pub mod defaults;
pub mod error;
pub mod horseman;
pub mod impact;
pub mod leaks;
pub mod models;
pub mod repository;

/// Test utilities including plan fixture builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use db::Database;
pub use defaults::EstimatorDefaults;
pub use error::{Error, Result};
pub use horseman::{Horseman, HorsemanLabel};
pub use impact::{ImpactBasis, ImpactParser, ParsedImpact};
pub use leaks::{compute, HorsemanBreakdown, LeakEstimator, LeakResult, LeakSummary, LeakTotals};
pub use models::{ImpactRange, NewPlan, Plan, PlanContent, PlanStatus};
pub use repository::{estimate_from_repository, PlanRepository};
