//! Config command implementation.

use crate::cli::ConfigCommands;
use crate::config::{self, CliOverrides, DoneRatioSource};
use crate::error::{ChecklistError, Result};

/// Execute a config subcommand against the DB config table.
///
/// # Errors
///
/// Returns an error if the value is invalid for a known key or the
/// database operation fails.
pub fn execute(command: &ConfigCommands, cli: &CliOverrides) -> Result<()> {
    let dir = config::discover_dir(None)?;
    let (mut store, _) = config::open_storage(&dir, cli)?;

    match command {
        ConfigCommands::Get { key } => match store.get_config(key)? {
            Some(value) => println!("{value}"),
            None => println!("(unset)"),
        },

        ConfigCommands::Set { key, value } => {
            validate_known_key(key, value)?;
            store.set_config(key, value)?;
            println!("{key} = {value}");
        }

        ConfigCommands::Unset { key } => {
            if store.delete_config(key)? {
                println!("Unset {key}");
            } else {
                println!("{key} was not set");
            }
        }

        ConfigCommands::List => {
            let map = store.get_all_config()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else if map.is_empty() {
                println!("No config values set");
            } else {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                for (key, value) in entries {
                    println!("{key} = {value}");
                }
            }
        }
    }

    Ok(())
}

/// Known keys get their values checked at write time so a typo surfaces
/// here instead of silently disabling a feature later.
fn validate_known_key(key: &str, value: &str) -> Result<()> {
    match key {
        "done_ratio_source" => {
            value.parse::<DoneRatioSource>()?;
        }
        "checklist_done_ratio" => {
            value.trim().parse::<bool>().map_err(|_| {
                ChecklistError::Config(format!(
                    "invalid checklist_done_ratio '{value}' (use true or false)"
                ))
            })?;
        }
        _ => {}
    }
    Ok(())
}
