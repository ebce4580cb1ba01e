//! List command implementation.

use crate::cli::ListArgs;
use crate::config::{self, CliOverrides};
use crate::error::{ChecklistError, Result};
use crate::format;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the issue is missing or the query fails.
pub fn execute(args: &ListArgs, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (store, _) = config::open_storage(&dir, cli)?;

    if !store.issue_exists(&args.issue)? {
        return Err(ChecklistError::IssueNotFound {
            id: args.issue.clone(),
        });
    }

    let items = store.list_for_issue(&args.issue)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No checklist items for {}", args.issue);
        return Ok(());
    }

    for item in &items {
        println!("{}", format::checklist_line(item));
    }
    let (done, total) = format::progress(&items);
    if total > 0 {
        println!("{done}/{total} done");
    }

    Ok(())
}
