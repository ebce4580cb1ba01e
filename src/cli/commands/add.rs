//! Add command implementation.

use crate::cli::AddArgs;
use crate::config::{self, CliOverrides, Settings};
use crate::error::{ChecklistError, Result};
use crate::model::NewChecklist;
use crate::perm::{Authorizer, Permission, ResolvedAuthorizer};

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the issue is missing, the actor lacks edit
/// permission, or validation fails.
pub fn execute(args: &AddArgs, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (mut store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);
    let settings = Settings::from_config(&cfg)?;
    let auth = ResolvedAuthorizer::from_config(&cfg);

    let issue = store
        .get_issue(&args.issue)?
        .ok_or_else(|| ChecklistError::IssueNotFound {
            id: args.issue.clone(),
        })?;

    // Creating an item makes the actor its author, so either edit
    // permission suffices.
    let project = issue.project.as_deref();
    let may_add = auth.allowed_to(&actor, Permission::EditChecklists, project)
        || auth.allowed_to(&actor, Permission::EditOwnChecklists, project);
    if !may_add {
        return Err(ChecklistError::PermissionDenied {
            user: actor,
            permission: Permission::EditChecklists.as_str().to_string(),
        });
    }

    let new = NewChecklist {
        issue_id: args.issue.clone(),
        subject: args.subject.clone(),
        position: args.position,
        is_section: args.section,
        is_active: !args.inactive,
    };
    let item = store.create_checklist(&new, &actor)?;

    // The denominator changed; keep the issue's ratio in sync.
    store.recalc_issue_done_ratio(&item.issue_id, &settings, &actor)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("Added {} to {}: {}", item.id, item.issue_id, item.info());
    }

    Ok(())
}
