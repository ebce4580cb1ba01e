//! Version command implementation.

use crate::error::Result;

/// Print version information.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if json {
        let payload = serde_json::json!({ "name": "ckl", "version": version });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("ckl {version}");
    }

    Ok(())
}
