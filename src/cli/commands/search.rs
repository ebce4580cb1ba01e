//! Search command implementation.

use crate::cli::SearchArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format;
use crate::perm::{Authorizer, Permission, ResolvedAuthorizer};
use std::collections::HashMap;

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn execute(args: &SearchArgs, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);
    let auth = ResolvedAuthorizer::from_config(&cfg);

    let matches = store.search_checklists(&args.query, args.project.as_deref())?;

    // Results stay permission-scoped: each hit needs view access on its
    // issue's project.
    let mut projects: HashMap<String, Option<String>> = HashMap::new();
    let mut visible = Vec::new();
    for item in matches {
        let project = match projects.get(&item.issue_id) {
            Some(project) => project.clone(),
            None => {
                let project = store.get_issue(&item.issue_id)?.and_then(|i| i.project);
                projects.insert(item.issue_id.clone(), project.clone());
                project
            }
        };
        if auth.allowed_to(&actor, Permission::ViewChecklists, project.as_deref()) {
            visible.push(item);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No matches for '{}'", args.query);
        return Ok(());
    }

    for item in &visible {
        println!("{}  {}", item.issue_id, format::checklist_line(item));
    }

    Ok(())
}
