//! Core data types for `checklist_rust`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Checklist` - A single checklist line item belonging to an issue
//! - `Issue` - The owning work item (minimal surface: subject, project, done ratio)
//! - `Event` - Audit log entries
//! - `FeedEntry` - Activity feed rendering of a checklist item

use crate::perm::{Authorizer, Permission};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(b: &bool) -> bool {
    !*b
}

const fn default_true() -> bool {
    true
}

/// Maximum length of a checklist subject, enforced by validation and schema.
pub const SUBJECT_MAX_LEN: usize = 512;

/// Fixed type tag attached to checklist entries in the event feed.
pub const FEED_TYPE_TAG: &str = "issue issue-closed";

/// A single checklist line item belonging to one issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checklist {
    /// Rowid assigned by the store at creation. Immutable.
    pub id: i64,

    /// Owning issue.
    pub issue_id: String,

    /// Actor who created the item. Set once at creation, never from input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Line text (1-512 chars).
    pub subject: String,

    /// Ordering key within the owning issue's list, 1-based.
    pub position: i64,

    /// Completion state.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_done: bool,

    /// Section headers are excluded from done-ratio math.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_section: bool,

    /// Soft-visibility toggle.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Creation timestamp; doubles as the feed timestamp.
    pub created_at: DateTime<Utc>,
}

impl Checklist {
    /// Single-line text rendering: `[x] subject` when done, `[ ] subject` otherwise.
    #[must_use]
    pub fn info(&self) -> String {
        format!(
            "[{}] {}",
            if self.is_done { 'x' } else { ' ' },
            self.subject.trim()
        )
    }

    /// Whether `user` may edit this item.
    ///
    /// A user may edit when they hold `edit_checklists` on the item's
    /// project, or they authored the item and hold `edit_own_checklists`.
    /// `project` derives from the owning issue and may be absent.
    #[must_use]
    pub fn editable_by(
        &self,
        user: Option<&str>,
        project: Option<&str>,
        auth: &impl Authorizer,
    ) -> bool {
        let Some(user) = user else {
            return false;
        };

        if auth.allowed_to(user, Permission::EditChecklists, project) {
            return true;
        }

        self.author.as_deref() == Some(user)
            && auth.allowed_to(user, Permission::EditOwnChecklists, project)
    }
}

/// Fields accepted when creating a checklist item.
///
/// `author` and `id` are intentionally absent: both are assigned by the
/// store. A missing `position` means "append to the bottom of the list".
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewChecklist {
    pub issue_id: String,
    pub subject: String,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub is_section: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewChecklist {
    #[must_use]
    pub fn new(issue_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            subject: subject.into(),
            position: None,
            is_section: false,
            is_active: true,
        }
    }
}

/// The owning work item. Checklist items derive the issue's completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub id: String,

    pub subject: String,

    /// Project the issue belongs to, if any. Scopes permission checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Completion percentage (0-100, multiples of 10 when checklist-derived).
    #[serde(default)]
    pub done_ratio: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Compute the decile-truncated completion percentage.
///
/// Matches the historical integer-division order exactly:
/// `(done * 10) / total * 10`, so 1 of 3 done yields 30, not 33.
/// `total` must be non-zero; callers check item counts before dividing.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn done_decile(done: usize, total: usize) -> i32 {
    ((done * 10) / total * 10) as i32
}

/// Audit event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Created,
    Updated,
    Checked,
    Unchecked,
    Moved,
    Deleted,
    RatioChanged,
    Custom(String),
}

impl EventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Checked => "checked",
            Self::Unchecked => "unchecked",
            Self::Moved => "moved",
            Self::Deleted => "deleted",
            Self::RatioChanged => "ratio_changed",
            Self::Custom(value) => value,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        let event_type = match value.as_str() {
            "created" => Self::Created,
            "updated" => Self::Updated,
            "checked" => Self::Checked,
            "unchecked" => Self::Unchecked,
            "moved" => Self::Moved,
            "deleted" => Self::Deleted,
            "ratio_changed" => Self::RatioChanged,
            _ => Self::Custom(value),
        };
        Ok(event_type)
    }
}

/// An event in an issue's history (audit log).
///
/// Also serves as the journal-detail carrier for legacy-format detection:
/// before the structured model, checklist state lived in plain-text
/// `[ ] line` / `[x] line` journal entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub issue_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_id: Option<i64>,
    pub event_type: EventType,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// True when either recorded value carries the legacy plain-text
    /// checklist line encoding.
    #[must_use]
    pub fn is_old_format(&self) -> bool {
        crate::util::legacy::is_old_format(self.old_value.as_deref(), self.new_value.as_deref())
    }
}

/// Activity feed rendering of a checklist item.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub timestamp: DateTime<Utc>,
    /// Link target referencing the owning issue.
    pub url: String,
    pub type_tag: &'static str,
    pub title: String,
    pub description: String,
}

impl FeedEntry {
    /// Build the feed entry for a checklist item and its owning issue.
    #[must_use]
    pub fn for_checklist(item: &Checklist, issue: &Issue) -> Self {
        Self {
            timestamp: item.created_at,
            url: format!("/issues/{}", item.issue_id),
            type_tag: FEED_TYPE_TAG,
            title: item.subject.clone(),
            description: format!("Issue: {}", issue.subject),
        }
    }
}
