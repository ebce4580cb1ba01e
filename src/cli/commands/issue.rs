//! Issue subcommand implementations.

use crate::cli::IssueCommands;
use crate::config::{self, CliOverrides};
use crate::error::{ChecklistError, Result};
use crate::format;
use crate::model::Issue;
use chrono::Utc;
use serde::Serialize;

/// JSON output for an issue together with its checklist.
#[derive(Serialize)]
struct IssueDetails {
    issue: Issue,
    items: Vec<crate::model::Checklist>,
}

/// Execute an issue subcommand.
///
/// # Errors
///
/// Returns an error if database operations fail or the issue is missing.
pub fn execute(command: &IssueCommands, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (mut store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);

    match command {
        IssueCommands::Add {
            subject,
            id,
            project,
        } => {
            let id = match id {
                Some(id) => id.clone(),
                None => store.allocate_issue_id(&config::issue_prefix(&cfg))?,
            };
            let now = Utc::now();
            let issue = Issue {
                id,
                subject: subject.clone(),
                project: project.clone(),
                done_ratio: 0,
                created_at: now,
                updated_at: now,
            };
            store.create_issue(&issue, &actor)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&issue)?);
            } else {
                println!("Created {}: {}", issue.id, issue.subject);
            }
        }

        IssueCommands::Show { id } => {
            let issue = store
                .get_issue(id)?
                .ok_or_else(|| ChecklistError::IssueNotFound { id: id.clone() })?;
            let items = store.list_for_issue(id)?;

            if cli.json {
                let details = IssueDetails { issue, items };
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                println!("{}", format::issue_line(&issue));
                for item in &items {
                    println!("{}", format::checklist_line(item));
                }
                let (done, total) = format::progress(&items);
                if total > 0 {
                    println!("{done}/{total} done");
                }
            }
        }

        IssueCommands::List => {
            let issues = store.list_issues()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else if issues.is_empty() {
                println!("No issues");
            } else {
                for issue in &issues {
                    println!("{}", format::issue_line(issue));
                }
            }
        }
    }

    Ok(())
}
