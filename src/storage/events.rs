//! Audit event reads.
//!
//! Events are written by the mutation protocol, atomically with the
//! mutations that produce them. Reads return newest first.

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::model::{Event, EventType};
use crate::util::time::parse_db_timestamp;

/// Get events for an issue, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_events(conn: &Connection, issue_id: &str, limit: usize) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        r"
        SELECT id, issue_id, checklist_id, event_type, actor, old_value, new_value, comment, created_at
        FROM events
        WHERE issue_id = ?1
        ORDER BY created_at DESC, id DESC
        LIMIT ?2
        ",
    )?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let events = stmt
        .query_map(params![issue_id, limit], event_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(events)
}

fn event_from_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    let event_type: String = row.get(3)?;
    Ok(Event {
        id: row.get(0)?,
        issue_id: row.get(1)?,
        checklist_id: row.get(2)?,
        event_type: parse_event_type(&event_type),
        actor: row.get(4)?,
        old_value: row.get(5)?,
        new_value: row.get(6)?,
        comment: row.get(7)?,
        created_at: parse_db_timestamp(&row.get::<_, String>(8)?),
    })
}

fn parse_event_type(s: &str) -> EventType {
    match s {
        "created" => EventType::Created,
        "updated" => EventType::Updated,
        "checked" => EventType::Checked,
        "unchecked" => EventType::Unchecked,
        "moved" => EventType::Moved,
        "deleted" => EventType::Deleted,
        "ratio_changed" => EventType::RatioChanged,
        other => EventType::Custom(other.to_string()),
    }
}
