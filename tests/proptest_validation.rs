//! Property tests for validation rules, decile math, and position
//! resolution.

use checklist_rust::model::{Checklist, done_decile};
use checklist_rust::storage::resolve_insert_position;
use checklist_rust::validation::ChecklistValidator;
use chrono::Utc;
use proptest::prelude::*;

fn item_with_subject(subject: String) -> Checklist {
    Checklist {
        id: 0,
        issue_id: "issue-1".to_string(),
        author: None,
        subject,
        position: 1,
        is_done: false,
        is_section: false,
        is_active: true,
        created_at: Utc::now(),
    }
}

proptest! {
    #[test]
    fn subjects_within_limit_pass(subject in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,511}") {
        // ASCII generator keeps char count == byte count.
        prop_assume!(subject.len() <= 512);
        let item = item_with_subject(subject);
        prop_assert!(ChecklistValidator::validate(&item).is_ok());
    }

    #[test]
    fn oversized_subjects_fail(extra in 1usize..200) {
        let item = item_with_subject("x".repeat(512 + extra));
        prop_assert!(ChecklistValidator::validate(&item).is_err());
    }

    #[test]
    fn decile_is_bounded_and_multiple_of_ten(total in 1usize..500, done_seed in 0usize..500) {
        let done = done_seed % (total + 1);
        let ratio = done_decile(done, total);

        prop_assert!((0..=100).contains(&ratio));
        prop_assert_eq!(ratio % 10, 0);
    }

    #[test]
    fn decile_truncates_toward_zero(total in 1usize..500, done_seed in 0usize..500) {
        let done = done_seed % (total + 1);
        let ratio = i64::from(done_decile(done, total));
        let done = i64::try_from(done).unwrap();
        let total = i64::try_from(total).unwrap();

        // floor semantics: ratio <= true percentage < ratio + 10
        prop_assert!(ratio * total <= 100 * done);
        prop_assert!((ratio + 10) * total > 100 * done);
    }

    #[test]
    fn resolved_positions_never_collide(
        persisted in proptest::collection::vec(1i64..100, 0..12),
        requested in proptest::option::of(1i64..100),
    ) {
        let position = resolve_insert_position(requested, &persisted);
        prop_assert!(!persisted.contains(&position));
        prop_assert!(position >= 1);
    }

    #[test]
    fn absent_request_appends_to_bottom(
        persisted in proptest::collection::vec(1i64..100, 0..12),
    ) {
        let bottom = persisted.iter().copied().max().unwrap_or(0) + 1;
        prop_assert_eq!(resolve_insert_position(None, &persisted), bottom);
    }

    #[test]
    fn free_request_is_honored(
        persisted in proptest::collection::vec(1i64..100, 0..12),
        requested in 1i64..100,
    ) {
        prop_assume!(!persisted.contains(&requested));
        prop_assert_eq!(resolve_insert_position(Some(requested), &persisted), requested);
    }
}
