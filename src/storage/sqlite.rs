//! `SQLite` storage implementation.

use crate::config::{DoneRatioSource, Settings};
use crate::error::{ChecklistError, Result};
use crate::model::{Checklist, Event, EventType, Issue, NewChecklist, done_decile};
use crate::perm::{Authorizer, Permission};
use crate::storage::events::get_events;
use crate::storage::schema::apply_schema;
use crate::util::time::parse_db_timestamp;
use crate::validation::{ChecklistValidator, IssueValidator};
use chrono::Utc;
use rusqlite::{Connection, Transaction};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const CHECKLIST_COLUMNS: &str =
    "id, issue_id, author, subject, position, is_done, is_section, is_active, created_at";

const ISSUE_COLUMNS: &str = "id, subject, project, done_ratio, created_at, updated_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

/// Context for a mutation operation, tracking audit side effects.
pub struct MutationContext {
    pub op_name: String,
    pub actor: String,
    pub events: Vec<Event>,
}

impl MutationContext {
    #[must_use]
    pub fn new(op_name: &str, actor: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            actor: actor.to_string(),
            events: Vec::new(),
        }
    }

    pub fn record_event(
        &mut self,
        event_type: EventType,
        issue_id: &str,
        checklist_id: Option<i64>,
        details: Option<String>,
    ) {
        self.events.push(Event {
            id: 0, // Placeholder, DB assigns auto-inc ID
            issue_id: issue_id.to_string(),
            checklist_id,
            event_type,
            actor: self.actor.clone(),
            old_value: None,
            new_value: None,
            comment: details,
            created_at: Utc::now(),
        });
    }

    /// Record a field change event with old and new values.
    #[allow(clippy::too_many_arguments)]
    pub fn record_field_change(
        &mut self,
        event_type: EventType,
        issue_id: &str,
        checklist_id: Option<i64>,
        old_value: Option<String>,
        new_value: Option<String>,
        comment: Option<String>,
    ) {
        self.events.push(Event {
            id: 0,
            issue_id: issue_id.to_string(),
            checklist_id,
            event_type,
            actor: self.actor.clone(),
            old_value,
            new_value,
            comment,
            created_at: Utc::now(),
        });
    }
}

/// Allow-listed field updates for a checklist item.
///
/// This is the only path by which external input reaches a persisted row:
/// `id` and `author` have no representation here, and unknown fields are
/// rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecklistPatch {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub issue_id: Option<String>,
    #[serde(default)]
    pub is_done: Option<bool>,
    #[serde(default)]
    pub is_section: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ChecklistPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.position.is_none()
            && self.issue_id.is_none()
            && self.is_done.is_none()
            && self.is_section.is_none()
            && self.is_active.is_none()
    }
}

/// Resolve the position for an item entering an issue's list.
///
/// An explicit position that no persisted sibling uses is honored. A
/// colliding or absent position lands at the bottom of the list,
/// `max(persisted) + 1`. Callers run this against positions read in the
/// same transaction as the write, so concurrent inserts serialize on the
/// write lock instead of racing to the same slot.
#[must_use]
pub fn resolve_insert_position(requested: Option<i64>, persisted: &[i64]) -> i64 {
    let bottom = persisted.iter().copied().max().unwrap_or(0) + 1;
    match requested {
        Some(position) if !persisted.contains(&position) => position,
        _ => bottom,
    }
}

impl SqliteStore {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a new connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Execute a mutation inside one `IMMEDIATE` transaction, writing any
    /// recorded audit events before commit.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; the transaction is rolled back.
    pub fn mutate<F, R>(&mut self, op: &str, actor: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let mut ctx = MutationContext::new(op, actor);

        let result = f(&tx, &mut ctx)?;

        for event in ctx.events {
            tx.execute(
                "INSERT INTO events (issue_id, checklist_id, event_type, actor, old_value, new_value, comment, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    event.issue_id,
                    event.checklist_id,
                    event.event_type.as_str(),
                    event.actor,
                    event.old_value,
                    event.new_value,
                    event.comment,
                    event.created_at.to_rfc3339()
                ],
            )?;
        }

        tx.commit()?;

        tracing::debug!(op = %ctx.op_name, actor = %ctx.actor, "mutation committed");

        Ok(result)
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Create a new issue.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the insert fails.
    pub fn create_issue(&mut self, issue: &Issue, actor: &str) -> Result<()> {
        IssueValidator::validate(issue).map_err(ChecklistError::from_validation_errors)?;

        self.mutate("create_issue", actor, |tx, ctx| {
            tx.execute(
                "INSERT INTO issues (id, subject, project, done_ratio, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    issue.id,
                    issue.subject,
                    issue.project,
                    issue.done_ratio,
                    issue.created_at.to_rfc3339(),
                    issue.updated_at.to_rfc3339(),
                ],
            )?;

            ctx.record_event(
                EventType::Created,
                &issue.id,
                None,
                Some(format!("Created issue: {}", issue.subject)),
            );

            Ok(())
        })
    }

    /// Get an issue by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?");
        let mut stmt = self.conn.prepare(&sql)?;
        let result = stmt.query_row([id], issue_from_row);

        match result {
            Ok(issue) => Ok(Some(issue)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all issues, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_issues(&self) -> Result<Vec<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let issues = stmt
            .query_map([], issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    /// Return true if the issue exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn issue_exists(&self, id: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM issues WHERE id = ?", [id], |row| {
                row.get(0)
            })?;
        Ok(count > 0)
    }

    /// Delete an issue. Its checklist items and events cascade with it.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue does not exist.
    pub fn delete_issue(&mut self, id: &str, actor: &str) -> Result<Issue> {
        let issue = self
            .get_issue(id)?
            .ok_or_else(|| ChecklistError::IssueNotFound { id: id.to_string() })?;

        self.mutate("delete_issue", actor, |tx, _ctx| {
            tx.execute("DELETE FROM issues WHERE id = ?", [id])?;
            Ok(issue)
        })
    }

    /// Allocate the next sequential issue ID for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata update fails.
    pub fn allocate_issue_id(&mut self, prefix: &str) -> Result<String> {
        let tx = self.conn.transaction()?;
        let next = match tx.query_row(
            "SELECT value FROM metadata WHERE key = 'next_issue_number'",
            [],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => value.parse::<i64>().unwrap_or(1),
            Err(rusqlite::Error::QueryReturnedNoRows) => 1,
            Err(e) => return Err(e.into()),
        };
        tx.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('next_issue_number', ?)",
            [(next + 1).to_string()],
        )?;
        tx.commit()?;
        Ok(format!("{prefix}-{next}"))
    }

    /// Recompute an issue's done ratio from its checklist items.
    ///
    /// No-ops (returning `Ok(false)`) when the done-ratio source is not the
    /// issue field, when the checklist integration is disabled, or when the
    /// issue has no non-section items. The zero-item check strictly
    /// precedes the division.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue does not exist; no partial
    /// update occurs.
    pub fn recalc_issue_done_ratio(
        &mut self,
        issue_id: &str,
        settings: &Settings,
        actor: &str,
    ) -> Result<bool> {
        let issue = self
            .get_issue(issue_id)?
            .ok_or_else(|| ChecklistError::IssueNotFound {
                id: issue_id.to_string(),
            })?;

        if settings.done_ratio_source != DoneRatioSource::IssueField
            || !settings.checklist_done_ratio
        {
            return Ok(false);
        }

        self.mutate("recalc_done_ratio", actor, |tx, ctx| {
            let (total, done): (i64, i64) = tx.query_row(
                "SELECT COUNT(*), COALESCE(SUM(is_done), 0)
                 FROM checklists WHERE issue_id = ? AND is_section = 0",
                [issue_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            if total == 0 {
                return Ok(false);
            }

            let ratio = done_decile(
                usize::try_from(done).unwrap_or(0),
                usize::try_from(total).unwrap_or(1),
            );

            tx.execute(
                "UPDATE issues SET done_ratio = ?, updated_at = ? WHERE id = ?",
                rusqlite::params![ratio, Utc::now().to_rfc3339(), issue_id],
            )?;

            if ratio != issue.done_ratio {
                ctx.record_field_change(
                    EventType::RatioChanged,
                    issue_id,
                    None,
                    Some(issue.done_ratio.to_string()),
                    Some(ratio.to_string()),
                    None,
                );
            }

            Ok(true)
        })
    }

    // ========================================================================
    // Checklist items
    // ========================================================================

    /// Create a checklist item.
    ///
    /// Position resolution, validation, and the insert all run in one
    /// transaction: a requested position colliding with a persisted sibling
    /// is reassigned to the bottom of the issue's list.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the owning issue does not exist, or a
    /// validation error if the resulting row is invalid.
    pub fn create_checklist(&mut self, new: &NewChecklist, actor: &str) -> Result<Checklist> {
        let now = Utc::now();
        self.mutate("create_checklist", actor, |tx, ctx| {
            if !issue_exists_tx(tx, &new.issue_id)? {
                return Err(ChecklistError::IssueNotFound {
                    id: new.issue_id.clone(),
                });
            }

            let persisted = sibling_positions(tx, &new.issue_id, None)?;
            let position = resolve_insert_position(new.position, &persisted);

            let mut item = Checklist {
                id: 0,
                issue_id: new.issue_id.clone(),
                author: Some(ctx.actor.clone()),
                subject: new.subject.clone(),
                position,
                is_done: false,
                is_section: new.is_section,
                is_active: new.is_active,
                created_at: now,
            };

            ChecklistValidator::validate(&item).map_err(ChecklistError::from_validation_errors)?;

            tx.execute(
                "INSERT INTO checklists (issue_id, author, subject, position, is_done, is_section, is_active, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    item.issue_id,
                    item.author,
                    item.subject,
                    item.position,
                    i32::from(item.is_done),
                    i32::from(item.is_section),
                    i32::from(item.is_active),
                    item.created_at.to_rfc3339(),
                ],
            )?;
            item.id = tx.last_insert_rowid();

            ctx.record_event(
                EventType::Created,
                &item.issue_id,
                Some(item.id),
                Some(format!("Added checklist item: {}", item.subject)),
            );

            Ok(item)
        })
    }

    /// Get a checklist item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_checklist(&self, id: i64) -> Result<Option<Checklist>> {
        fetch_checklist(&self.conn, id)
    }

    /// List an issue's checklist items in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_for_issue(&self, issue_id: &str) -> Result<Vec<Checklist>> {
        let sql = format!(
            "SELECT {CHECKLIST_COLUMNS} FROM checklists WHERE issue_id = ? ORDER BY position, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map([issue_id], checklist_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Subjects of an issue's checklist items, in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn subjects_for_issue(&self, issue_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT subject FROM checklists WHERE issue_id = ? ORDER BY position, id")?;
        let subjects = stmt
            .query_map([issue_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(subjects)
    }

    /// Apply allow-listed field updates to a checklist item.
    ///
    /// A position update that collides with a persisted sibling is
    /// re-resolved to the bottom of the list, as is the current position
    /// when the item moves to another issue whose list already uses it.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistNotFound` if the item does not exist,
    /// `IssueNotFound` if a target issue does not, or a validation error if
    /// the patched row is invalid.
    pub fn update_checklist(
        &mut self,
        id: i64,
        patch: &ChecklistPatch,
        actor: &str,
    ) -> Result<Checklist> {
        if patch.is_empty() {
            return self
                .get_checklist(id)?
                .ok_or(ChecklistError::ChecklistNotFound { id });
        }

        self.mutate("update_checklist", actor, |tx, ctx| {
            let current =
                fetch_checklist(tx, id)?.ok_or(ChecklistError::ChecklistNotFound { id })?;

            let mut updated = current.clone();

            if let Some(ref issue_id) = patch.issue_id {
                if *issue_id != current.issue_id {
                    if !issue_exists_tx(tx, issue_id)? {
                        return Err(ChecklistError::IssueNotFound {
                            id: issue_id.clone(),
                        });
                    }
                    updated.issue_id.clone_from(issue_id);
                }
            }

            if let Some(ref subject) = patch.subject {
                updated.subject.clone_from(subject);
            }
            if let Some(is_done) = patch.is_done {
                updated.is_done = is_done;
            }
            if let Some(is_section) = patch.is_section {
                updated.is_section = is_section;
            }
            if let Some(is_active) = patch.is_active {
                updated.is_active = is_active;
            }

            // Re-resolve the position against the (possibly new) sibling
            // list when it changed or the item moved between issues.
            let moved_issue = updated.issue_id != current.issue_id;
            if patch.position.is_some() || moved_issue {
                let requested = patch.position.unwrap_or(current.position);
                let persisted = sibling_positions(tx, &updated.issue_id, Some(id))?;
                updated.position = resolve_insert_position(Some(requested), &persisted);
            }

            ChecklistValidator::validate(&updated)
                .map_err(ChecklistError::from_validation_errors)?;

            tx.execute(
                "UPDATE checklists
                 SET issue_id = ?, subject = ?, position = ?, is_done = ?, is_section = ?, is_active = ?
                 WHERE id = ?",
                rusqlite::params![
                    updated.issue_id,
                    updated.subject,
                    updated.position,
                    i32::from(updated.is_done),
                    i32::from(updated.is_section),
                    i32::from(updated.is_active),
                    id,
                ],
            )?;

            record_update_events(ctx, &current, &updated);

            Ok(updated)
        })
    }

    /// Set an item's completion state.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistNotFound` if the item does not exist.
    pub fn set_done(&mut self, id: i64, done: bool, actor: &str) -> Result<Checklist> {
        let patch = ChecklistPatch {
            is_done: Some(done),
            ..ChecklistPatch::default()
        };
        self.update_checklist(id, &patch, actor)
    }

    /// Delete a checklist item.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistNotFound` if the item does not exist.
    pub fn delete_checklist(&mut self, id: i64, actor: &str) -> Result<Checklist> {
        self.mutate("delete_checklist", actor, |tx, ctx| {
            let item =
                fetch_checklist(tx, id)?.ok_or(ChecklistError::ChecklistNotFound { id })?;

            tx.execute("DELETE FROM checklists WHERE id = ?", [id])?;

            ctx.record_event(
                EventType::Deleted,
                &item.issue_id,
                Some(id),
                Some(format!("Removed checklist item: {}", item.info())),
            );

            Ok(item)
        })
    }

    // ========================================================================
    // Search and feeds
    // ========================================================================

    /// Search checklist items by subject, optionally scoped to a project.
    ///
    /// Matching is a case-insensitive substring match; results come back in
    /// ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_checklists(
        &self,
        query: &str,
        project: Option<&str>,
    ) -> Result<Vec<Checklist>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = String::from(
            r"SELECT c.id, c.issue_id, c.author, c.subject, c.position, c.is_done, c.is_section, c.is_active, c.created_at
            FROM checklists c
            JOIN issues i ON i.id = c.issue_id
            WHERE c.subject LIKE ?",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        params.push(Box::new(format!("%{trimmed}%")));

        if let Some(project) = project {
            sql.push_str(" AND i.project = ?");
            params.push(Box::new(project.to_string()));
        }

        sql.push_str(" ORDER BY c.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(AsRef::as_ref).collect();
        let items = stmt
            .query_map(params_refs.as_slice(), checklist_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Recent checklist items visible to `viewer`, newest first.
    ///
    /// Each item requires the `view_checklists` permission on its project.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn recent_activity(
        &self,
        project: Option<&str>,
        viewer: &str,
        auth: &impl Authorizer,
        limit: usize,
    ) -> Result<Vec<(Checklist, Issue)>> {
        let mut sql = String::from(
            r"SELECT c.id, c.issue_id, c.author, c.subject, c.position, c.is_done, c.is_section, c.is_active, c.created_at,
                     i.id, i.subject, i.project, i.done_ratio, i.created_at, i.updated_at
            FROM checklists c
            JOIN issues i ON i.id = c.issue_id
            WHERE 1=1",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(project) = project {
            sql.push_str(" AND i.project = ?");
            params.push(Box::new(project.to_string()));
        }

        sql.push_str(" ORDER BY c.created_at DESC, c.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(AsRef::as_ref).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let item = checklist_from_row(row)?;
                let issue = Issue {
                    id: row.get(9)?,
                    subject: row.get(10)?,
                    project: row.get(11)?,
                    done_ratio: row.get(12)?,
                    created_at: parse_db_timestamp(&row.get::<_, String>(13)?),
                    updated_at: parse_db_timestamp(&row.get::<_, String>(14)?),
                };
                Ok((item, issue))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let visible = rows
            .into_iter()
            .filter(|(_, issue)| {
                auth.allowed_to(viewer, Permission::ViewChecklists, issue.project.as_deref())
            })
            .take(limit)
            .collect();

        Ok(visible)
    }

    /// Events recorded against an issue, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn events_for_issue(&self, issue_id: &str, limit: usize) -> Result<Vec<Event>> {
        get_events(&self.conn, issue_id, limit)
    }

    // ========================================================================
    // Config and metadata
    // ========================================================================

    /// Get a config value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?", [key], |row| {
                row.get(0)
            });
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all config key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_all_config(&self) -> Result<std::collections::HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM config")?;
        let map = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<_, _>>()?;
        Ok(map)
    }

    /// Set a config value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO config (key, value) VALUES (?, ?)",
            [key, value],
        )?;
        Ok(())
    }

    /// Delete a config value, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn delete_config(&mut self, key: &str) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM config WHERE key = ?", [key])?;
        Ok(changed > 0)
    }

    /// Get a metadata value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?", [key], |row| {
                row.get(0)
            });
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a metadata value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)",
            [key, value],
        )?;
        Ok(())
    }
}

fn checklist_from_row(row: &rusqlite::Row) -> rusqlite::Result<Checklist> {
    Ok(Checklist {
        id: row.get(0)?,
        issue_id: row.get(1)?,
        author: row.get(2)?,
        subject: row.get(3)?,
        position: row.get(4)?,
        is_done: row.get::<_, i64>(5)? != 0,
        is_section: row.get::<_, i64>(6)? != 0,
        is_active: row.get::<_, i64>(7)? != 0,
        created_at: parse_db_timestamp(&row.get::<_, String>(8)?),
    })
}

fn issue_from_row(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: row.get(0)?,
        subject: row.get(1)?,
        project: row.get(2)?,
        done_ratio: row.get(3)?,
        created_at: parse_db_timestamp(&row.get::<_, String>(4)?),
        updated_at: parse_db_timestamp(&row.get::<_, String>(5)?),
    })
}

fn fetch_checklist(conn: &Connection, id: i64) -> Result<Option<Checklist>> {
    let sql = format!("SELECT {CHECKLIST_COLUMNS} FROM checklists WHERE id = ?");
    let mut stmt = conn.prepare(&sql)?;
    match stmt.query_row([id], checklist_from_row) {
        Ok(item) => Ok(Some(item)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn issue_exists_tx(conn: &Connection, id: &str) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM issues WHERE id = ?", [id], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

/// Positions used by persisted siblings in an issue's list.
fn sibling_positions(conn: &Connection, issue_id: &str, exclude: Option<i64>) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT position FROM checklists WHERE issue_id = ? AND id != COALESCE(?, -1)",
    )?;
    let positions = stmt
        .query_map(rusqlite::params![issue_id, exclude], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(positions)
}

fn record_update_events(ctx: &mut MutationContext, before: &Checklist, after: &Checklist) {
    let id = Some(after.id);

    if before.subject != after.subject {
        ctx.record_field_change(
            EventType::Updated,
            &after.issue_id,
            id,
            Some(before.subject.clone()),
            Some(after.subject.clone()),
            Some("Subject changed".to_string()),
        );
    }

    if before.is_done != after.is_done {
        let event_type = if after.is_done {
            EventType::Checked
        } else {
            EventType::Unchecked
        };
        ctx.record_field_change(
            event_type,
            &after.issue_id,
            id,
            Some(before.info()),
            Some(after.info()),
            None,
        );
    }

    if before.position != after.position {
        ctx.record_field_change(
            EventType::Moved,
            &after.issue_id,
            id,
            Some(before.position.to_string()),
            Some(after.position.to_string()),
            None,
        );
    }

    if before.issue_id != after.issue_id {
        ctx.record_field_change(
            EventType::Updated,
            &after.issue_id,
            id,
            Some(before.issue_id.clone()),
            Some(after.issue_id.clone()),
            Some("Moved to another issue".to_string()),
        );
    }

    if before.is_section != after.is_section || before.is_active != after.is_active {
        ctx.record_event(
            EventType::Updated,
            &after.issue_id,
            id,
            Some("Flags changed".to_string()),
        );
    }
}
