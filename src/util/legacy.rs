//! Legacy plain-text checklist line detection.
//!
//! Before the structured checklist model, items lived inside journal text
//! as `[ ] line` / `[x] line` entries. Migration and history rendering need
//! to recognize those lines in old journal values.

use once_cell::sync::Lazy;
use regex::Regex;

/// A `[ ]` or `[x]` marker, one space, then at least one character.
static LEGACY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[ x]\] .+$").expect("valid legacy line regex"));

/// True when `text` is a legacy-encoded checklist line.
#[must_use]
pub fn matches_legacy_line(text: &str) -> bool {
    LEGACY_LINE.is_match(text)
}

/// True when either journal value carries the legacy encoding.
#[must_use]
pub fn is_old_format(old_value: Option<&str>, value: Option<&str>) -> bool {
    old_value.is_some_and(matches_legacy_line) || value.is_some_and(matches_legacy_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unchecked_marker() {
        assert!(is_old_format(Some("[ ] task"), None));
    }

    #[test]
    fn detects_checked_marker() {
        assert!(is_old_format(Some("[x] buy milk"), None));
    }

    #[test]
    fn detects_in_either_value() {
        assert!(is_old_format(None, Some("[x] done thing")));
        assert!(is_old_format(Some("plain"), Some("[ ] pending thing")));
    }

    #[test]
    fn rejects_plain_text() {
        assert!(!is_old_format(None, Some("plain text")));
        assert!(!is_old_format(None, None));
    }

    #[test]
    fn requires_space_and_body() {
        assert!(!matches_legacy_line("[x]"));
        assert!(!matches_legacy_line("[x] "));
        assert!(!matches_legacy_line("[y] task"));
        assert!(!matches_legacy_line("prefix [x] task"));
    }
}
