//! Recalc command implementation.

use crate::config::{self, CliOverrides, Settings};
use crate::error::{ChecklistError, Result};

/// Execute the recalc command.
///
/// # Errors
///
/// Returns an error if the issue is missing or the update fails.
pub fn execute(issue_id: &str, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (mut store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);
    let settings = Settings::from_config(&cfg)?;

    let recalculated = store.recalc_issue_done_ratio(issue_id, &settings, &actor)?;

    let issue = store
        .get_issue(issue_id)?
        .ok_or_else(|| ChecklistError::IssueNotFound {
            id: issue_id.to_string(),
        })?;

    if cli.json {
        let payload = serde_json::json!({
            "issue": issue.id,
            "recalculated": recalculated,
            "done_ratio": issue.done_ratio,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if recalculated {
        println!("{} done ratio: {}%", issue.id, issue.done_ratio);
    } else {
        println!(
            "{} unchanged (checklist-driven ratio disabled or no checklist items)",
            issue.id
        );
    }

    Ok(())
}
