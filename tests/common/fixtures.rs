//! Shared test fixtures.

use checklist_rust::model::{Issue, NewChecklist};
use checklist_rust::storage::SqliteStore;
use chrono::Utc;

pub fn issue(id: &str) -> Issue {
    let now = Utc::now();
    Issue {
        id: id.to_string(),
        subject: format!("Issue {id}"),
        project: None,
        done_ratio: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn issue_in_project(id: &str, project: &str) -> Issue {
    let mut issue = issue(id);
    issue.project = Some(project.to_string());
    issue
}

pub fn item(issue_id: &str, subject: &str) -> NewChecklist {
    NewChecklist::new(issue_id, subject)
}

pub fn section(issue_id: &str, subject: &str) -> NewChecklist {
    let mut new = NewChecklist::new(issue_id, subject);
    new.is_section = true;
    new
}

/// Create an issue row so checklist items have something to hang off.
pub fn seed_issue(store: &mut SqliteStore, id: &str) {
    store
        .create_issue(&issue(id), "fixture")
        .expect("Failed to seed issue");
}

pub fn seed_issue_in_project(store: &mut SqliteStore, id: &str, project: &str) {
    store
        .create_issue(&issue_in_project(id, project), "fixture")
        .expect("Failed to seed issue");
}
