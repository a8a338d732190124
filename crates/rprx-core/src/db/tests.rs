//! Database tests

use super::*;
use crate::error::Error;
use crate::leaks::LeakEstimator;
use crate::models::*;
use crate::repository::{estimate_from_repository, PlanRepository};
use crate::test_utils::PlanBuilder;

fn checklist_plan(title: &str, steps: usize) -> NewPlan {
    PlanBuilder::new(0, title)
        .impact(400.0, 800.0)
        .steps(steps)
        .horseman(&["Insurance"])
        .build_new()
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_plans().unwrap().is_empty());
    assert!(db.focused_plan_id().unwrap().is_none());
}

#[test]
fn test_plans_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    let columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('plans') WHERE name IN ('id', 'title', 'status', 'content', 'is_focused', 'created_at', 'updated_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(columns, 7, "plans table should have 7 expected columns");
}

#[test]
fn test_create_and_get_plan() {
    let db = Database::in_memory().unwrap();
    let id = db.create_plan(&checklist_plan("Shop insurance", 3)).unwrap();
    assert!(id > 0);

    let plan = db.get_plan(id).unwrap().unwrap();
    assert_eq!(plan.title, "Shop insurance");
    assert_eq!(plan.status, PlanStatus::NotStarted);
    assert_eq!(plan.content.steps.len(), 3);
    assert_eq!(
        plan.content.estimated_impact,
        Some(ImpactRange::new(400.0, 800.0))
    );
    assert_eq!(plan.content.horseman, vec!["Insurance".to_string()]);
    assert!(!plan.is_focused);

    assert!(db.get_plan(id + 100).unwrap().is_none());
}

#[test]
fn test_create_plan_rejects_blank_title() {
    let db = Database::in_memory().unwrap();
    let err = db.create_plan(&checklist_plan("   ", 1)).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn test_list_plans_in_creation_order() {
    let db = Database::in_memory().unwrap();
    db.create_plan(&checklist_plan("First", 1)).unwrap();
    db.create_plan(&checklist_plan("Second", 1)).unwrap();

    let titles: Vec<String> = db
        .list_plans()
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn test_toggle_step_derives_status() {
    let db = Database::in_memory().unwrap();
    let id = db.create_plan(&checklist_plan("Two steps", 2)).unwrap();

    let plan = db.toggle_step(id, 0).unwrap();
    assert_eq!(plan.content.completed_steps, vec![0]);
    assert_eq!(plan.status, PlanStatus::InProgress);

    let plan = db.toggle_step(id, 1).unwrap();
    assert_eq!(plan.content.completed_steps, vec![0, 1]);
    assert_eq!(plan.status, PlanStatus::Completed);

    let plan = db.toggle_step(id, 0).unwrap();
    assert_eq!(plan.content.completed_steps, vec![1]);
    assert_eq!(plan.status, PlanStatus::InProgress);

    let plan = db.toggle_step(id, 1).unwrap();
    assert!(plan.content.completed_steps.is_empty());
    assert_eq!(plan.status, PlanStatus::NotStarted);
}

#[test]
fn test_toggle_step_out_of_range() {
    let db = Database::in_memory().unwrap();
    let id = db.create_plan(&checklist_plan("One step", 1)).unwrap();

    assert!(matches!(db.toggle_step(id, 1), Err(Error::InvalidData(_))));
    assert!(matches!(db.toggle_step(id + 1, 0), Err(Error::NotFound(_))));
}

#[test]
fn test_toggle_step_cleans_stale_indices() {
    let db = Database::in_memory().unwrap();
    let new_plan = PlanBuilder::new(0, "Stale")
        .steps(3)
        .completed(&[2, 2, 8])
        .build_new();
    let id = db.create_plan(&new_plan).unwrap();

    let plan = db.toggle_step(id, 0).unwrap();
    assert_eq!(plan.content.completed_steps, vec![0, 2]);
}

#[test]
fn test_set_plan_status() {
    let db = Database::in_memory().unwrap();
    let id = db.create_plan(&checklist_plan("Manual", 0)).unwrap();

    db.set_plan_status(id, PlanStatus::Completed).unwrap();
    assert_eq!(
        db.get_plan(id).unwrap().unwrap().status,
        PlanStatus::Completed
    );

    assert!(matches!(
        db.set_plan_status(id + 1, PlanStatus::Completed),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_single_focused_plan() {
    let db = Database::in_memory().unwrap();
    let a = db.create_plan(&checklist_plan("A", 1)).unwrap();
    let b = db.create_plan(&checklist_plan("B", 1)).unwrap();

    db.set_focused_plan(Some(a)).unwrap();
    assert_eq!(db.focused_plan_id().unwrap(), Some(a));

    db.set_focused_plan(Some(b)).unwrap();
    assert_eq!(db.focused_plan_id().unwrap(), Some(b));
    assert!(!db.get_plan(a).unwrap().unwrap().is_focused);
    assert!(db.get_plan(b).unwrap().unwrap().is_focused);

    db.set_focused_plan(None).unwrap();
    assert!(db.focused_plan_id().unwrap().is_none());
}

#[test]
fn test_focus_unknown_plan_keeps_existing_focus() {
    let db = Database::in_memory().unwrap();
    let a = db.create_plan(&checklist_plan("A", 1)).unwrap();
    db.set_focused_plan(Some(a)).unwrap();

    assert!(matches!(
        db.set_focused_plan(Some(a + 50)),
        Err(Error::NotFound(_))
    ));
    assert_eq!(db.focused_plan_id().unwrap(), Some(a));
}

#[test]
fn test_delete_focused_plan_clears_focus() {
    let db = Database::in_memory().unwrap();
    let a = db.create_plan(&checklist_plan("A", 1)).unwrap();
    db.set_focused_plan(Some(a)).unwrap();

    db.delete_plan(a).unwrap();
    assert!(db.focused_plan_id().unwrap().is_none());
    assert!(matches!(db.delete_plan(a), Err(Error::NotFound(_))));
}

#[test]
fn test_import_plans_is_atomic() {
    let db = Database::in_memory().unwrap();
    let good = vec![checklist_plan("One", 1), checklist_plan("Two", 2)];
    assert_eq!(db.import_plans(&good).unwrap(), 2);

    let bad = vec![checklist_plan("Three", 1), checklist_plan("", 1)];
    assert!(db.import_plans(&bad).is_err());
    assert_eq!(db.list_plans().unwrap().len(), 2);
}

#[test]
fn test_unreadable_content_falls_back_to_defaults() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO plans (title, status, content) VALUES ('Broken', 'someday', 'not json')",
        [],
    )
    .unwrap();

    let plans = db.list_plans().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].status, PlanStatus::NotStarted);
    assert_eq!(plans[0].content, PlanContent::default());

    let result = estimate_from_repository(&db, &LeakEstimator::default()).unwrap();
    assert_eq!(result.total_low, 500);
    assert_eq!(result.total_high, 2000);
}

#[test]
fn test_database_as_repository() {
    let db = Database::in_memory().unwrap();
    let id = db.create_plan(&checklist_plan("Focus me", 4)).unwrap();
    db.toggle_step(id, 0).unwrap();
    db.set_focused_plan(Some(id)).unwrap();

    let repo: &dyn PlanRepository = &db;
    assert_eq!(repo.focused_plan_id().unwrap(), Some(id));

    let result = estimate_from_repository(repo, &LeakEstimator::default()).unwrap();
    assert_eq!(result.total_recovered, 150);
    assert_eq!(result.percent_recovered, 25);
    assert_eq!(result.focused_plan_progress, 25);
    assert_eq!(result.by_horseman.insurance.recovered, 150);
}
