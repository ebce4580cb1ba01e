//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Issue checklist manager (`SQLite`)
#[derive(Parser, Debug)]
#[command(name = "ckl", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (auto-discover .ckl/*.db if not set)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Actor name for audit trail and permission checks
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a checklist workspace
    Init {
        /// Overwrite existing workspace
        #[arg(long)]
        force: bool,
    },

    /// Manage issues
    Issue {
        #[command(subcommand)]
        command: IssueCommands,
    },

    /// Add a checklist item to an issue
    Add(AddArgs),

    /// List an issue's checklist items
    List(ListArgs),

    /// Show checklist item details
    Show {
        /// Checklist item ID
        id: i64,
    },

    /// Mark a checklist item as done
    Check(ToggleArgs),

    /// Mark a checklist item as pending
    Uncheck(ToggleArgs),

    /// Update a checklist item
    Update(UpdateArgs),

    /// Remove a checklist item
    Remove(RemoveArgs),

    /// Search checklist items by subject
    Search(SearchArgs),

    /// Show recent checklist activity
    Activity(ActivityArgs),

    /// Recompute an issue's done ratio from its checklist
    Recalc {
        /// Issue ID
        issue: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum IssueCommands {
    /// Create an issue
    Add {
        /// Issue subject
        subject: String,

        /// Explicit issue ID (sequential if not set)
        #[arg(long)]
        id: Option<String>,

        /// Project the issue belongs to
        #[arg(long)]
        project: Option<String>,
    },

    /// Show an issue with its checklist
    Show {
        /// Issue ID
        id: String,
    },

    /// List issues
    List,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Owning issue ID
    pub issue: String,

    /// Item text
    pub subject: String,

    /// Explicit list position (appends to the bottom if unset or taken)
    #[arg(long)]
    pub position: Option<i64>,

    /// Create a section header (excluded from done-ratio math)
    #[arg(long)]
    pub section: bool,

    /// Create the item hidden
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Issue ID
    pub issue: String,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Checklist item ID
    pub id: i64,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Checklist item ID
    pub id: i64,

    /// New item text
    #[arg(long)]
    pub subject: Option<String>,

    /// New list position (lands at the bottom if taken)
    #[arg(long)]
    pub position: Option<i64>,

    /// Move the item to another issue
    #[arg(long)]
    pub issue: Option<String>,

    /// Set or clear the section flag
    #[arg(long)]
    pub section: Option<bool>,

    /// Set or clear the visibility flag
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Checklist item ID
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Substring to match against item subjects
    pub query: String,

    /// Restrict matches to one project
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Restrict to one project
    #[arg(long)]
    pub project: Option<String>,

    /// Maximum entries to show
    #[arg(long, default_value_t = 15)]
    pub limit: usize,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },

    /// Delete a config value
    Unset {
        /// Config key
        key: String,
    },

    /// List all config values
    List,
}
