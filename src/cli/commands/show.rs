//! Show command implementation.

use crate::config::{self, CliOverrides};
use crate::error::{ChecklistError, Result};
use crate::model::{Checklist, FeedEntry};
use serde::Serialize;

/// JSON output for a checklist item with its feed rendering.
#[derive(Serialize)]
struct ChecklistDetails {
    item: Checklist,
    feed: FeedEntry,
}

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the item is missing or the query fails.
pub fn execute(id: i64, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (store, _) = config::open_storage(&dir, cli)?;

    let item = store
        .get_checklist(id)?
        .ok_or(ChecklistError::ChecklistNotFound { id })?;
    let issue = store
        .get_issue(&item.issue_id)?
        .ok_or_else(|| ChecklistError::IssueNotFound {
            id: item.issue_id.clone(),
        })?;
    let feed = FeedEntry::for_checklist(&item, &issue);

    if cli.json {
        let details = ChecklistDetails { item, feed };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{} {}", item.id, item.info());
    println!("  issue:    {} ({})", issue.id, issue.subject);
    if let Some(project) = issue.project.as_deref() {
        println!("  project:  {project}");
    }
    if let Some(author) = item.author.as_deref() {
        println!("  author:   {author}");
    }
    println!("  position: {}", item.position);
    if item.is_section {
        println!("  section:  yes");
    }
    if !item.is_active {
        println!("  active:   no");
    }
    println!("  created:  {}", item.created_at.format("%Y-%m-%d %H:%M"));

    Ok(())
}
