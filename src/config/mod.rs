//! Configuration management for `checklist_rust`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`CKL_ACTOR`, `CKL_DB`)
//! 3. Project config (.ckl/config.yaml)
//! 4. DB config table
//! 5. Defaults

use crate::error::{ChecklistError, Result};
use crate::storage::SqliteStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Workspace directory name discovered by walking up from the CWD.
pub const DIR_NAME: &str = ".ckl";
/// Default database filename used when metadata is missing.
const DEFAULT_DB_FILENAME: &str = "checklists.db";
/// Environment override for the workspace directory.
const ENV_DIR: &str = "CKL_DIR";
/// Environment override for the database path.
const ENV_DB: &str = "CKL_DB";
/// Environment override for the acting user.
const ENV_ACTOR: &str = "CKL_ACTOR";

/// Default busy timeout when none is configured (ms).
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 30_000;

/// Startup metadata describing the database file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub database: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            database: DEFAULT_DB_FILENAME.to_string(),
        }
    }
}

impl Metadata {
    /// Load metadata.json from the workspace directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("metadata.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let mut metadata: Self = serde_json::from_str(&contents)?;

        if metadata.database.trim().is_empty() {
            metadata.database = DEFAULT_DB_FILENAME.to_string();
        }

        Ok(metadata)
    }

    /// Write metadata.json into the workspace directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join("metadata.json");
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub actor: Option<String>,
    pub json: bool,
    pub lock_timeout: Option<u64>,
}

/// Discover the active `.ckl` directory.
///
/// Honors `CKL_DIR` when set, otherwise walks up from `start` (or CWD).
///
/// # Errors
///
/// Returns an error if no workspace is found or the CWD cannot be read.
pub fn discover_dir(start: Option<&Path>) -> Result<PathBuf> {
    if let Ok(value) = env::var(ENV_DIR) {
        if !value.trim().is_empty() {
            let path = PathBuf::from(value);
            if path.is_dir() {
                return Ok(path);
            }
        }
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    Err(ChecklistError::NotInitialized)
}

/// Initialize a workspace under `parent`, returning the `.ckl` directory.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a workspace exists and `force` is not
/// set, or an error if files cannot be created.
pub fn init_workspace(parent: &Path, force: bool) -> Result<PathBuf> {
    let dir = parent.join(DIR_NAME);
    if dir.join("metadata.json").exists() && !force {
        return Err(ChecklistError::AlreadyInitialized { path: dir });
    }

    fs::create_dir_all(&dir)?;
    let metadata = Metadata::default();
    metadata.save(&dir)?;

    // Opening applies the schema.
    let mut store = SqliteStore::open(&dir.join(&metadata.database))?;
    store.set_metadata(
        "schema_version",
        &crate::storage::schema::CURRENT_SCHEMA_VERSION.to_string(),
    )?;

    Ok(dir)
}

/// Resolve the database path for a workspace.
#[must_use]
pub fn resolve_db_path(dir: &Path, metadata: &Metadata, cli: &CliOverrides) -> PathBuf {
    if let Some(ref db) = cli.db {
        return db.clone();
    }
    if let Ok(value) = env::var(ENV_DB) {
        if !value.trim().is_empty() {
            return PathBuf::from(value);
        }
    }
    dir.join(&metadata.database)
}

/// Open storage using resolved paths, returning the store and the path used.
///
/// # Errors
///
/// Returns an error if metadata cannot be read or the database cannot be
/// opened.
pub fn open_storage(dir: &Path, cli: &CliOverrides) -> Result<(SqliteStore, PathBuf)> {
    let metadata = Metadata::load(dir)?;
    let db_path = resolve_db_path(dir, &metadata, cli);
    let timeout = cli.lock_timeout.unwrap_or(DEFAULT_LOCK_TIMEOUT_MS);
    let store = SqliteStore::open_with_timeout(&db_path, Some(timeout))?;
    Ok((store, db_path))
}

/// Load configuration with the documented precedence order into one flat
/// map (nested YAML keys are flattened with dots).
///
/// # Errors
///
/// Returns an error if the config file cannot be read or DB access fails.
pub fn load_config(
    dir: &Path,
    store: Option<&SqliteStore>,
    cli: &CliOverrides,
) -> Result<HashMap<String, String>> {
    let mut map = default_config();

    if let Some(store) = store {
        for (key, value) in store.get_all_config()? {
            map.insert(key, value);
        }
    }

    for (key, value) in load_yaml_config(&dir.join("config.yaml"))? {
        map.insert(key, value);
    }

    if let Ok(actor) = env::var(ENV_ACTOR) {
        if !actor.trim().is_empty() {
            map.insert("actor".to_string(), actor);
        }
    }

    if let Some(ref actor) = cli.actor {
        map.insert("actor".to_string(), actor.clone());
    }

    Ok(map)
}

fn default_config() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("done_ratio_source".to_string(), "issue_field".to_string());
    map.insert("checklist_done_ratio".to_string(), "true".to_string());
    map.insert("issue_prefix".to_string(), "issue".to_string());
    map
}

/// Read a YAML config file into a flat dotted-key map. Missing file is an
/// empty map.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_yaml_config(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let contents = fs::read_to_string(path)?;
    let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;

    let mut map = HashMap::new();
    flatten_yaml(&value, None, &mut map);
    Ok(map)
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: Option<&str>, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = key.as_str() else {
                    continue;
                };
                let full = prefix.map_or_else(|| key.to_string(), |p| format!("{p}.{key}"));
                flatten_yaml(child, Some(&full), out);
            }
        }
        serde_yaml::Value::String(s) => {
            if let Some(prefix) = prefix {
                out.insert(prefix.to_string(), s.clone());
            }
        }
        serde_yaml::Value::Number(n) => {
            if let Some(prefix) = prefix {
                out.insert(prefix.to_string(), n.to_string());
            }
        }
        serde_yaml::Value::Bool(b) => {
            if let Some(prefix) = prefix {
                out.insert(prefix.to_string(), b.to_string());
            }
        }
        serde_yaml::Value::Null | serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {
        }
    }
}

/// Resolve the acting user with fallback to `$USER` and a safe default.
#[must_use]
pub fn resolve_actor(config: &HashMap<String, String>) -> String {
    config
        .get("actor")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            env::var("USER")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Resolve the issue ID prefix for new issues.
#[must_use]
pub fn issue_prefix(config: &HashMap<String, String>) -> String {
    config
        .get("issue_prefix")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "issue".to_string())
}

/// Where an issue's done ratio comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoneRatioSource {
    /// The issue's own `done_ratio` field, derived from checklists.
    #[default]
    IssueField,
    /// Workflow status drives the ratio; checklists leave it alone.
    Status,
}

impl DoneRatioSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IssueField => "issue_field",
            Self::Status => "status",
        }
    }
}

impl FromStr for DoneRatioSource {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "issue_field" => Ok(Self::IssueField),
            "status" => Ok(Self::Status),
            other => Err(ChecklistError::Config(format!(
                "invalid done_ratio_source '{other}' (use issue_field or status)"
            ))),
        }
    }
}

/// Settings gating derived done-ratio computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub done_ratio_source: DoneRatioSource,
    pub checklist_done_ratio: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            done_ratio_source: DoneRatioSource::IssueField,
            checklist_done_ratio: true,
        }
    }
}

impl Settings {
    /// Parse settings out of a merged config map.
    ///
    /// # Errors
    ///
    /// Returns a config error on unparseable values.
    pub fn from_config(config: &HashMap<String, String>) -> Result<Self> {
        let done_ratio_source = config
            .get("done_ratio_source")
            .map_or(Ok(DoneRatioSource::IssueField), |value| value.parse())?;

        let checklist_done_ratio = match config.get("checklist_done_ratio") {
            None => true,
            Some(value) => value.trim().parse::<bool>().map_err(|_| {
                ChecklistError::Config(format!(
                    "invalid checklist_done_ratio '{value}' (use true or false)"
                ))
            })?,
        };

        Ok(Self {
            done_ratio_source,
            checklist_done_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_checklist_driven() {
        let settings = Settings::from_config(&HashMap::new()).unwrap();
        assert_eq!(settings.done_ratio_source, DoneRatioSource::IssueField);
        assert!(settings.checklist_done_ratio);
    }

    #[test]
    fn settings_parse_status_source() {
        let mut config = HashMap::new();
        config.insert("done_ratio_source".to_string(), "status".to_string());
        config.insert("checklist_done_ratio".to_string(), "false".to_string());
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.done_ratio_source, DoneRatioSource::Status);
        assert!(!settings.checklist_done_ratio);
    }

    #[test]
    fn settings_reject_unknown_source() {
        let mut config = HashMap::new();
        config.insert("done_ratio_source".to_string(), "moon_phase".to_string());
        assert!(Settings::from_config(&config).is_err());
    }

    #[test]
    fn yaml_flattening_uses_dotted_keys() {
        let value: serde_yaml::Value = serde_yaml::from_str(
            "actor: alice\nperm:\n  apollo:\n    bob: edit_checklists\nchecklist_done_ratio: false\n",
        )
        .unwrap();
        let mut map = HashMap::new();
        flatten_yaml(&value, None, &mut map);

        assert_eq!(map.get("actor").unwrap(), "alice");
        assert_eq!(map.get("perm.apollo.bob").unwrap(), "edit_checklists");
        assert_eq!(map.get("checklist_done_ratio").unwrap(), "false");
    }

    #[test]
    fn actor_prefers_config_value() {
        let mut config = HashMap::new();
        config.insert("actor".to_string(), "carol".to_string());
        assert_eq!(resolve_actor(&config), "carol");
    }

    #[test]
    fn metadata_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = Metadata::load(dir.path()).unwrap();
        assert_eq!(metadata.database, "checklists.db");
    }

    #[test]
    fn init_workspace_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let ckl_dir = init_workspace(dir.path(), false).unwrap();
        assert!(ckl_dir.join("metadata.json").exists());
        assert!(ckl_dir.join("checklists.db").exists());

        let err = init_workspace(dir.path(), false).unwrap_err();
        assert!(matches!(err, ChecklistError::AlreadyInitialized { .. }));

        // Force reinit succeeds.
        init_workspace(dir.path(), true).unwrap();
    }
}
