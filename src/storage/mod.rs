//! Storage backends.

pub mod events;
pub mod schema;
pub mod sqlite;

pub use sqlite::{ChecklistPatch, MutationContext, SqliteStore, resolve_insert_position};
