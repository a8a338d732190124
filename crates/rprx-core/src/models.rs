//! Domain models for RPRx

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stored status of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "not_started" | "notstarted" => Ok(Self::NotStarted),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            _ => Err(format!("Unknown plan status: {}", s)),
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Annual dollar impact range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactRange {
    pub low: f64,
    pub high: f64,
}

impl ImpactRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// A usable range: finite, non-negative, and ordered
    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low >= 0.0 && self.low <= self.high
    }
}

/// The JSON payload saved with a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanContent {
    /// Estimated annual impact; `None` when missing or not shaped like `{low, high}`
    #[serde(default, deserialize_with = "lenient_impact")]
    pub estimated_impact: Option<ImpactRange>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Indices into `steps` that the user has checked off
    #[serde(default, alias = "completedSteps", deserialize_with = "lenient_indices")]
    pub completed_steps: Vec<usize>,
    /// Free-text category labels, normalized by [`crate::horseman::HorsemanLabel`]
    #[serde(default, deserialize_with = "string_or_list")]
    pub horseman: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
    /// Free-text impact description the range was parsed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_text: Option<String>,
}

impl PlanContent {
    /// Distinct completed step indices that point at an existing step
    pub fn completed_step_indices(&self) -> BTreeSet<usize> {
        self.completed_steps
            .iter()
            .copied()
            .filter(|&i| i < self.steps.len())
            .collect()
    }

    pub fn completed_step_count(&self) -> usize {
        self.completed_step_indices().len()
    }

    /// Status implied by the checklist alone
    pub fn checklist_status(&self) -> PlanStatus {
        let done = self.completed_step_count();
        if !self.steps.is_empty() && done == self.steps.len() {
            PlanStatus::Completed
        } else if done > 0 {
            PlanStatus::InProgress
        } else {
            PlanStatus::NotStarted
        }
    }
}

/// A saved implementation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub title: String,
    pub status: PlanStatus,
    pub content: PlanContent,
    /// Whether this is the user's focused plan
    #[serde(default)]
    pub is_focused: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new plan to be saved (before DB insertion)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPlan {
    pub title: String,
    #[serde(default)]
    pub status: PlanStatus,
    #[serde(default)]
    pub content: PlanContent,
}

fn lenient_impact<'de, D>(deserializer: D) -> std::result::Result<Option<ImpactRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_indices<'de, D>(deserializer: D) -> std::result::Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let indices = match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_u64())
            .filter_map(|v| usize::try_from(v).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(indices)
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let labels = match value {
        serde_json::Value::String(s) => vec![s],
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_plan_status_round_trip() {
        for status in [
            PlanStatus::NotStarted,
            PlanStatus::InProgress,
            PlanStatus::Completed,
        ] {
            assert_eq!(PlanStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert_eq!(
            PlanStatus::from_str("In-Progress").unwrap(),
            PlanStatus::InProgress
        );
        assert!(PlanStatus::from_str("abandoned").is_err());
    }

    #[test]
    fn test_content_accepts_camel_case_completed_steps() {
        let content: PlanContent = serde_json::from_str(
            r#"{"steps": ["a", "b"], "completedSteps": [1], "horseman": ["Taxes"]}"#,
        )
        .unwrap();
        assert_eq!(content.completed_steps, vec![1]);
        assert_eq!(content.horseman, vec!["Taxes".to_string()]);
        assert!(content.estimated_impact.is_none());
    }

    #[test]
    fn test_malformed_impact_becomes_none() {
        let content: PlanContent =
            serde_json::from_str(r#"{"estimated_impact": {"low": "lots"}}"#).unwrap();
        assert!(content.estimated_impact.is_none());

        let content: PlanContent =
            serde_json::from_str(r#"{"estimated_impact": "$500-$1,000"}"#).unwrap();
        assert!(content.estimated_impact.is_none());

        let content: PlanContent =
            serde_json::from_str(r#"{"estimated_impact": {"low": 100, "high": 900}}"#).unwrap();
        assert_eq!(content.estimated_impact, Some(ImpactRange::new(100.0, 900.0)));
    }

    #[test]
    fn test_horseman_single_string() {
        let content: PlanContent = serde_json::from_str(r#"{"horseman": "Insurance"}"#).unwrap();
        assert_eq!(content.horseman, vec!["Insurance".to_string()]);
    }

    #[test]
    fn test_completed_steps_drop_negative_entries() {
        let content: PlanContent =
            serde_json::from_str(r#"{"steps": ["a"], "completed_steps": [-1, 0, "x"]}"#).unwrap();
        assert_eq!(content.completed_steps, vec![0]);
    }

    #[test]
    fn test_completed_step_indices_ignore_out_of_range_and_duplicates() {
        let content = PlanContent {
            steps: vec!["a".into(), "b".into(), "c".into()],
            completed_steps: vec![0, 0, 2, 7],
            ..Default::default()
        };
        assert_eq!(content.completed_step_count(), 2);
        assert_eq!(content.checklist_status(), PlanStatus::InProgress);
    }

    #[test]
    fn test_checklist_status() {
        let mut content = PlanContent {
            steps: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        assert_eq!(content.checklist_status(), PlanStatus::NotStarted);
        content.completed_steps = vec![1, 0];
        assert_eq!(content.checklist_status(), PlanStatus::Completed);

        let empty = PlanContent::default();
        assert_eq!(empty.checklist_status(), PlanStatus::NotStarted);
    }

    #[test]
    fn test_impact_range_validity() {
        assert!(ImpactRange::new(0.0, 0.0).is_valid());
        assert!(ImpactRange::new(100.0, 200.0).is_valid());
        assert!(!ImpactRange::new(300.0, 200.0).is_valid());
        assert!(!ImpactRange::new(-5.0, 200.0).is_valid());
        assert!(!ImpactRange::new(f64::NAN, 200.0).is_valid());
        assert_eq!(ImpactRange::new(400.0, 800.0).midpoint(), 600.0);
    }
}
