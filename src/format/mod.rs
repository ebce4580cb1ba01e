//! Plain-text rendering for CLI output.

use crate::model::{Checklist, FeedEntry, Issue};

/// One-line rendering of a checklist item for list output.
///
/// Sections render as headers; regular items as `[ ]`/`[x]` lines.
/// Inactive items are marked so they can be spotted without a flag dump.
#[must_use]
pub fn checklist_line(item: &Checklist) -> String {
    let body = if item.is_section {
        format!("-- {} --", item.subject.trim())
    } else {
        item.info()
    };

    if item.is_active {
        format!("{:>4}  {}", item.id, body)
    } else {
        format!("{:>4}  {} (inactive)", item.id, body)
    }
}

/// One-line rendering of an issue with its completion ratio.
#[must_use]
pub fn issue_line(issue: &Issue) -> String {
    let project = issue
        .project
        .as_deref()
        .map(|p| format!(" ({p})"))
        .unwrap_or_default();
    format!(
        "{}  [{:>3}%] {}{}",
        issue.id, issue.done_ratio, issue.subject, project
    )
}

/// One-line rendering of a feed entry for activity output.
#[must_use]
pub fn feed_line(entry: &FeedEntry) -> String {
    format!(
        "{}  {}  {} ({})",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.title,
        entry.description,
        entry.url
    )
}

/// Progress summary over an issue's items: `(done, total)` excluding
/// sections.
#[must_use]
pub fn progress(items: &[Checklist]) -> (usize, usize) {
    let actionable: Vec<_> = items.iter().filter(|i| !i.is_section).collect();
    let done = actionable.iter().filter(|i| i.is_done).count();
    (done, actionable.len())
}
