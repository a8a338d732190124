//! Plan ledger operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info, warn};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewPlan, Plan, PlanContent, PlanStatus};
use crate::repository::PlanRepository;

const PLAN_COLUMNS: &str = "id, title, status, content, is_focused, created_at, updated_at";

fn row_to_plan(row: &Row<'_>) -> rusqlite::Result<Plan> {
    let id: i64 = row.get(0)?;
    let status: String = row.get(2)?;
    let content: String = row.get(3)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    let status = status.parse().unwrap_or_else(|e| {
        warn!(plan_id = id, "{}, treating as not started", e);
        PlanStatus::NotStarted
    });
    let content = serde_json::from_str::<PlanContent>(&content).unwrap_or_else(|e| {
        warn!(plan_id = id, error = %e, "Unreadable plan content, using empty content");
        PlanContent::default()
    });

    Ok(Plan {
        id,
        title: row.get(1)?,
        status,
        content,
        is_focused: row.get(4)?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

fn validate(plan: &NewPlan) -> Result<()> {
    if plan.title.trim().is_empty() {
        return Err(Error::InvalidData("Plan title cannot be empty".to_string()));
    }
    Ok(())
}

impl Database {
    /// Save a new plan
    pub fn create_plan(&self, plan: &NewPlan) -> Result<i64> {
        validate(plan)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO plans (title, status, content) VALUES (?, ?, ?)",
            params![
                plan.title.trim(),
                plan.status.as_str(),
                serde_json::to_string(&plan.content)?
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(plan_id = id, title = %plan.title, "Created plan");
        Ok(id)
    }

    /// Save several plans in one transaction; nothing is saved if any is invalid
    pub fn import_plans(&self, plans: &[NewPlan]) -> Result<usize> {
        for plan in plans {
            validate(plan)?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for plan in plans {
            tx.execute(
                "INSERT INTO plans (title, status, content) VALUES (?, ?, ?)",
                params![
                    plan.title.trim(),
                    plan.status.as_str(),
                    serde_json::to_string(&plan.content)?
                ],
            )?;
        }
        tx.commit()?;

        info!("Imported {} plans", plans.len());
        Ok(plans.len())
    }

    /// All plans, oldest first
    pub fn list_plans(&self) -> Result<Vec<Plan>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM plans ORDER BY id", PLAN_COLUMNS))?;
        let plans = stmt
            .query_map([], row_to_plan)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(plans)
    }

    pub fn get_plan(&self, id: i64) -> Result<Option<Plan>> {
        let conn = self.conn()?;
        let plan = conn
            .query_row(
                &format!("SELECT {} FROM plans WHERE id = ?", PLAN_COLUMNS),
                params![id],
                row_to_plan,
            )
            .optional()?;
        Ok(plan)
    }

    fn require_plan(&self, id: i64) -> Result<Plan> {
        self.get_plan(id)?
            .ok_or_else(|| Error::NotFound(format!("Plan {}", id)))
    }

    /// Overwrite the stored status
    pub fn set_plan_status(&self, id: i64, status: PlanStatus) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE plans SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![status.as_str(), id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Plan {}", id)));
        }
        Ok(())
    }

    /// Check or uncheck step `index` and re-derive the stored status from the
    /// checklist. Returns the updated plan.
    pub fn toggle_step(&self, id: i64, index: usize) -> Result<Plan> {
        let plan = self.require_plan(id)?;
        let step_count = plan.content.steps.len();
        if index >= step_count {
            return Err(Error::InvalidData(format!(
                "Plan {} has {} steps, no step at index {}",
                id, step_count, index
            )));
        }

        let mut content = plan.content;
        let mut done = content.completed_step_indices();
        if !done.remove(&index) {
            done.insert(index);
        }
        content.completed_steps = done.into_iter().collect();
        let status = content.checklist_status();

        let conn = self.conn()?;
        conn.execute(
            "UPDATE plans SET content = ?, status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![serde_json::to_string(&content)?, status.as_str(), id],
        )?;

        debug!(plan_id = id, step = index, status = %status, "Toggled plan step");
        self.require_plan(id)
    }

    /// Make `id` the focused plan, or clear the focus with `None`
    pub fn set_focused_plan(&self, id: Option<i64>) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if let Some(id) = id {
            let exists: Option<i64> = tx
                .query_row("SELECT id FROM plans WHERE id = ?", params![id], |row| {
                    row.get(0)
                })
                .optional()?;
            if exists.is_none() {
                return Err(Error::NotFound(format!("Plan {}", id)));
            }
        }

        tx.execute("UPDATE plans SET is_focused = 0 WHERE is_focused = 1", [])?;
        if let Some(id) = id {
            tx.execute("UPDATE plans SET is_focused = 1 WHERE id = ?", params![id])?;
        }
        tx.commit()?;

        Ok(())
    }

    pub fn focused_plan_id(&self) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id = conn
            .query_row("SELECT id FROM plans WHERE is_focused = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    /// Delete a plan. Deleting the focused plan leaves no plan focused.
    pub fn delete_plan(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM plans WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Plan {}", id)));
        }
        info!(plan_id = id, "Deleted plan");
        Ok(())
    }
}

impl PlanRepository for Database {
    fn list_plans(&self) -> Result<Vec<Plan>> {
        Database::list_plans(self)
    }

    fn get_plan(&self, id: i64) -> Result<Option<Plan>> {
        Database::get_plan(self, id)
    }

    fn focused_plan_id(&self) -> Result<Option<i64>> {
        Database::focused_plan_id(self)
    }
}
