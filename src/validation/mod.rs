//! Validation helpers for `checklist_rust`.
//!
//! These routines enforce data constraints and return structured
//! validation errors without mutating storage. Storage mutations validate
//! before writing, so a failed validation never leaves partial state.

use crate::error::ValidationError;
use crate::model::{Checklist, Issue, SUBJECT_MAX_LEN};

/// Validates checklist item fields and invariants.
pub struct ChecklistValidator;

impl ChecklistValidator {
    /// Validate a checklist item and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(item: &Checklist) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Subject: required, max 512 chars.
        if item.subject.trim().is_empty() {
            errors.push(ValidationError::new("subject", "cannot be empty"));
        }
        if item.subject.len() > SUBJECT_MAX_LEN {
            errors.push(ValidationError::new("subject", "exceeds 512 characters"));
        }

        // Owning issue: required.
        if item.issue_id.trim().is_empty() {
            errors.push(ValidationError::new("issue_id", "cannot be empty"));
        }

        // Position: required positive ordinal. Non-numeric input never
        // reaches this point; it is rejected at the deserialization boundary.
        if item.position < 1 {
            errors.push(ValidationError::new("position", "must be positive"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validates issue fields.
pub struct IssueValidator;

impl IssueValidator {
    /// Validate an issue and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(issue: &Issue) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if issue.id.trim().is_empty() {
            errors.push(ValidationError::new("id", "cannot be empty"));
        }

        if issue.subject.trim().is_empty() {
            errors.push(ValidationError::new("subject", "cannot be empty"));
        }

        if !(0..=100).contains(&issue.done_ratio) {
            errors.push(ValidationError::new("done_ratio", "must be 0-100"));
        }

        if issue.updated_at < issue.created_at {
            errors.push(ValidationError::new(
                "updated_at",
                "cannot be before created_at",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_item() -> Checklist {
        Checklist {
            id: 0,
            issue_id: "issue-1".to_string(),
            author: None,
            subject: "write tests".to_string(),
            position: 1,
            is_done: false,
            is_section: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn valid_item_passes() {
        assert!(ChecklistValidator::validate(&valid_item()).is_ok());
    }

    #[test]
    fn empty_subject_fails() {
        let mut item = valid_item();
        item.subject = "   ".to_string();
        let errors = ChecklistValidator::validate(&item).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "subject"));
    }

    #[test]
    fn oversized_subject_fails() {
        let mut item = valid_item();
        item.subject = "x".repeat(513);
        let errors = ChecklistValidator::validate(&item).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "subject"));
    }

    #[test]
    fn subject_at_limit_passes() {
        let mut item = valid_item();
        item.subject = "x".repeat(512);
        assert!(ChecklistValidator::validate(&item).is_ok());
    }

    #[test]
    fn missing_issue_fails() {
        let mut item = valid_item();
        item.issue_id = String::new();
        let errors = ChecklistValidator::validate(&item).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "issue_id"));
    }

    #[test]
    fn non_positive_position_fails() {
        let mut item = valid_item();
        item.position = 0;
        let errors = ChecklistValidator::validate(&item).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "position"));
    }

    #[test]
    fn multiple_errors_accumulate() {
        let mut item = valid_item();
        item.subject = String::new();
        item.position = -3;
        let errors = ChecklistValidator::validate(&item).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn issue_done_ratio_bounds() {
        let now = Utc::now();
        let mut issue = Issue {
            id: "issue-1".to_string(),
            subject: "subject".to_string(),
            project: None,
            done_ratio: 110,
            created_at: now,
            updated_at: now,
        };
        assert!(IssueValidator::validate(&issue).is_err());
        issue.done_ratio = 100;
        assert!(IssueValidator::validate(&issue).is_ok());
    }
}
