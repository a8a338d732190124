//! Test utilities for building plans
//!
//! Available in unit tests and, with the `test-utils` feature, to other crates.

use chrono::{TimeZone, Utc};

use crate::models::{ImpactRange, NewPlan, Plan, PlanContent, PlanStatus};

/// Builder for [`Plan`] fixtures
///
/// ```rust,ignore
/// let plan = PlanBuilder::new(1, "Refinance")
///     .impact(1000.0, 2000.0)
///     .steps(4)
///     .completed(&[0, 1])
///     .horseman(&["debt"])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    id: i64,
    title: String,
    status: PlanStatus,
    content: PlanContent,
    is_focused: bool,
}

impl PlanBuilder {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            status: PlanStatus::NotStarted,
            content: PlanContent::default(),
            is_focused: false,
        }
    }

    pub fn impact(mut self, low: f64, high: f64) -> Self {
        self.content.estimated_impact = Some(ImpactRange::new(low, high));
        self
    }

    /// Add `count` numbered steps
    pub fn steps(mut self, count: usize) -> Self {
        self.content.steps = (1..=count).map(|i| format!("Step {}", i)).collect();
        self
    }

    pub fn completed(mut self, indices: &[usize]) -> Self {
        self.content.completed_steps = indices.to_vec();
        self
    }

    pub fn horseman(mut self, labels: &[&str]) -> Self {
        self.content.horseman = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn status(mut self, status: PlanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn focused(mut self) -> Self {
        self.is_focused = true;
        self
    }

    pub fn build(self) -> Plan {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Plan {
            id: self.id,
            title: self.title,
            status: self.status,
            content: self.content,
            is_focused: self.is_focused,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// The same fixture as an unsaved plan
    pub fn build_new(self) -> NewPlan {
        NewPlan {
            title: self.title,
            status: self.status,
            content: self.content,
        }
    }
}
