//! Update command implementation.

use crate::cli::UpdateArgs;
use crate::config::{self, CliOverrides, Settings};
use crate::error::{ChecklistError, Result};
use crate::model::Checklist;
use crate::perm::{Permission, ResolvedAuthorizer};
use crate::storage::ChecklistPatch;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the item is missing, the actor may not edit it, or
/// validation fails.
pub fn execute(args: &UpdateArgs, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (mut store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);
    let settings = Settings::from_config(&cfg)?;
    let auth = ResolvedAuthorizer::from_config(&cfg);

    let patch = ChecklistPatch {
        subject: args.subject.clone(),
        position: args.position,
        issue_id: args.issue.clone(),
        is_done: None,
        is_section: args.section,
        is_active: args.active,
    };

    let before = store
        .get_checklist(args.id)?
        .ok_or(ChecklistError::ChecklistNotFound { id: args.id })?;

    if patch.is_empty() {
        println!("No updates specified for {}", args.id);
        return Ok(());
    }

    let project = store.get_issue(&before.issue_id)?.and_then(|i| i.project);
    if !before.editable_by(Some(&actor), project.as_deref(), &auth) {
        return Err(ChecklistError::PermissionDenied {
            user: actor,
            permission: Permission::EditChecklists.as_str().to_string(),
        });
    }

    let after = store.update_checklist(args.id, &patch, &actor)?;

    // Section and issue moves shift the ratio denominator on both ends.
    store.recalc_issue_done_ratio(&before.issue_id, &settings, &actor)?;
    if after.issue_id != before.issue_id {
        store.recalc_issue_done_ratio(&after.issue_id, &settings, &actor)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&after)?);
    } else {
        print_update_summary(&before, &after);
    }

    Ok(())
}

/// Print a summary of what changed for the item.
fn print_update_summary(before: &Checklist, after: &Checklist) {
    println!("Updated {}: {}", after.id, after.info());

    if before.subject != after.subject {
        println!("  subject: {} -> {}", before.subject, after.subject);
    }
    if before.position != after.position {
        println!("  position: {} -> {}", before.position, after.position);
    }
    if before.issue_id != after.issue_id {
        println!("  issue: {} -> {}", before.issue_id, after.issue_id);
    }
    if before.is_section != after.is_section {
        println!("  section: {} -> {}", before.is_section, after.is_section);
    }
    if before.is_active != after.is_active {
        println!("  active: {} -> {}", before.is_active, after.is_active);
    }
}
