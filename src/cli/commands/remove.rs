//! Remove command implementation.

use crate::cli::RemoveArgs;
use crate::config::{self, CliOverrides, Settings};
use crate::error::{ChecklistError, Result};
use crate::perm::{Permission, ResolvedAuthorizer};

/// Execute the remove command.
///
/// # Errors
///
/// Returns an error if the item is missing or the actor may not edit it.
pub fn execute(args: &RemoveArgs, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (mut store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);
    let settings = Settings::from_config(&cfg)?;
    let auth = ResolvedAuthorizer::from_config(&cfg);

    let item = store
        .get_checklist(args.id)?
        .ok_or(ChecklistError::ChecklistNotFound { id: args.id })?;
    let project = store.get_issue(&item.issue_id)?.and_then(|i| i.project);

    if !item.editable_by(Some(&actor), project.as_deref(), &auth) {
        return Err(ChecklistError::PermissionDenied {
            user: actor,
            permission: Permission::EditChecklists.as_str().to_string(),
        });
    }

    let removed = store.delete_checklist(args.id, &actor)?;
    store.recalc_issue_done_ratio(&removed.issue_id, &settings, &actor)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&removed)?);
    } else {
        println!("Removed {}: {}", removed.id, removed.info());
    }

    Ok(())
}
