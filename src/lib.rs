//! Issue checklist manager (`SQLite`).
//!
//! `checklist_rust` stores checklist line items attached to issues:
//! validated subjects, per-issue ordering with bottom-of-list insertion,
//! derived issue completion ("done ratio"), permission-gated editing, and
//! search/activity views over the same rows.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod perm;
pub mod storage;
pub mod util;
pub mod validation;

pub use error::{ChecklistError, Result};
