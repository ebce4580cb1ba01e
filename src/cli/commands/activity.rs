//! Activity command implementation.

use crate::cli::ActivityArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format;
use crate::model::FeedEntry;
use crate::perm::ResolvedAuthorizer;

/// Execute the activity command.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn execute(args: &ActivityArgs, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (store, _) = config::open_storage(&dir, cli)?;
    let cfg = config::load_config(&dir, Some(&store), cli)?;
    let actor = config::resolve_actor(&cfg);
    let auth = ResolvedAuthorizer::from_config(&cfg);

    let recent = store.recent_activity(args.project.as_deref(), &actor, &auth, args.limit)?;
    let entries: Vec<FeedEntry> = recent
        .iter()
        .map(|(item, issue)| FeedEntry::for_checklist(item, issue))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No recent checklist activity");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format::feed_line(entry));
    }

    Ok(())
}
