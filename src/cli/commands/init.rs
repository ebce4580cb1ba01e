//! Init command implementation.

use crate::config;
use crate::error::Result;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the workspace already exists (without `--force`) or
/// cannot be created.
pub fn execute(force: bool, json: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let dir = config::init_workspace(&cwd, force)?;

    if json {
        let payload = serde_json::json!({ "initialized": dir.display().to_string() });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Initialized checklist workspace at {}", dir.display());
    }

    Ok(())
}
