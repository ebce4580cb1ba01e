//! Database schema definitions.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the checklist database.
pub const SCHEMA_SQL: &str = r"
    -- Issues table (minimal owning entity for checklist items)
    CREATE TABLE IF NOT EXISTS issues (
        id TEXT PRIMARY KEY,
        subject TEXT NOT NULL,
        project TEXT,
        done_ratio INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK (length(subject) >= 1),
        CHECK (done_ratio >= 0 AND done_ratio <= 100)
    );

    CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project);
    CREATE INDEX IF NOT EXISTS idx_issues_updated_at ON issues(updated_at);

    -- Checklist items
    CREATE TABLE IF NOT EXISTS checklists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        issue_id TEXT NOT NULL,
        author TEXT,
        subject TEXT NOT NULL,
        position INTEGER NOT NULL,
        is_done INTEGER NOT NULL DEFAULT 0,
        is_section INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE,
        CHECK (length(subject) >= 1 AND length(subject) <= 512),
        CHECK (position >= 1)
    );

    CREATE INDEX IF NOT EXISTS idx_checklists_issue_id ON checklists(issue_id);
    CREATE INDEX IF NOT EXISTS idx_checklists_issue_position ON checklists(issue_id, position);
    CREATE INDEX IF NOT EXISTS idx_checklists_created_at ON checklists(created_at);

    -- Events (Audit)
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        issue_id TEXT NOT NULL,
        checklist_id INTEGER,
        event_type TEXT NOT NULL,
        actor TEXT NOT NULL,
        old_value TEXT,
        new_value TEXT,
        comment TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_events_issue_id ON events(issue_id);
    CREATE INDEX IF NOT EXISTS idx_events_event_type ON events(event_type);
    CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at);
    CREATE INDEX IF NOT EXISTS idx_events_actor ON events(actor);

    -- Config (Runtime)
    CREATE TABLE IF NOT EXISTS config (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- Metadata
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}
