//! Bottom-of-list insertion and reordering behavior.
//!
//! New items land at the bottom unless the caller supplies an unused
//! position; colliding positions are reassigned to `max + 1`.

mod common;

use checklist_rust::model::NewChecklist;
use checklist_rust::storage::ChecklistPatch;
use common::{fixtures, test_db};

fn new_item(issue_id: &str, subject: &str, position: Option<i64>) -> NewChecklist {
    let mut new = NewChecklist::new(issue_id, subject);
    new.position = position;
    new
}

#[test]
fn append_defaults_to_bottom() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    let a = store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    let b = store
        .create_checklist(&new_item("issue-1", "b", None), "alice")
        .unwrap();
    let c = store
        .create_checklist(&new_item("issue-1", "c", None), "alice")
        .unwrap();

    assert_eq!((a.position, b.position, c.position), (1, 2, 3));
}

#[test]
fn explicit_unused_position_is_honored() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    let item = store
        .create_checklist(&new_item("issue-1", "b", Some(7)), "alice")
        .unwrap();

    assert_eq!(item.position, 7);
}

#[test]
fn colliding_position_reassigned_to_bottom() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "b", None), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "c", Some(9)), "alice")
        .unwrap();

    // Position 2 is taken, so the new item lands at max(1, 2, 9) + 1.
    let item = store
        .create_checklist(&new_item("issue-1", "d", Some(2)), "alice")
        .unwrap();
    assert_eq!(item.position, 10);
}

#[test]
fn positions_are_scoped_per_issue() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");
    fixtures::seed_issue(&mut store, "issue-2");

    store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    let other = store
        .create_checklist(&new_item("issue-2", "b", None), "alice")
        .unwrap();

    // Same slot is free in the other issue's list.
    assert_eq!(other.position, 1);
}

#[test]
fn list_orders_by_position() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    store
        .create_checklist(&new_item("issue-1", "last", Some(5)), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "first", Some(1)), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "middle", Some(3)), "alice")
        .unwrap();

    let subjects: Vec<_> = store
        .list_for_issue("issue-1")
        .unwrap()
        .into_iter()
        .map(|i| i.subject)
        .collect();
    assert_eq!(subjects, vec!["first", "middle", "last"]);
}

#[test]
fn move_to_unused_position_is_honored() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    let item = store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "b", None), "alice")
        .unwrap();

    let patch = ChecklistPatch {
        position: Some(9),
        ..ChecklistPatch::default()
    };
    let moved = store.update_checklist(item.id, &patch, "alice").unwrap();
    assert_eq!(moved.position, 9);
}

#[test]
fn move_to_colliding_position_lands_at_bottom() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    let a = store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "b", None), "alice")
        .unwrap();
    store
        .create_checklist(&new_item("issue-1", "c", None), "alice")
        .unwrap();

    let patch = ChecklistPatch {
        position: Some(2),
        ..ChecklistPatch::default()
    };
    let moved = store.update_checklist(a.id, &patch, "alice").unwrap();
    // 2 and 3 are held by siblings; the item's own old slot doesn't count.
    assert_eq!(moved.position, 4);
}

#[test]
fn subject_update_preserves_position() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");

    store
        .create_checklist(&new_item("issue-1", "a", None), "alice")
        .unwrap();
    let item = store
        .create_checklist(&new_item("issue-1", "b", None), "alice")
        .unwrap();

    let patch = ChecklistPatch {
        subject: Some("renamed".to_string()),
        ..ChecklistPatch::default()
    };
    let updated = store.update_checklist(item.id, &patch, "alice").unwrap();
    assert_eq!(updated.position, 2);
}

#[test]
fn cross_issue_move_resolves_collisions_in_target_list() {
    let mut store = test_db();
    fixtures::seed_issue(&mut store, "issue-1");
    fixtures::seed_issue(&mut store, "issue-2");

    let item = store
        .create_checklist(&new_item("issue-1", "mover", None), "alice")
        .unwrap();
    assert_eq!(item.position, 1);
    store
        .create_checklist(&new_item("issue-2", "occupant", None), "alice")
        .unwrap();

    let patch = ChecklistPatch {
        issue_id: Some("issue-2".to_string()),
        ..ChecklistPatch::default()
    };
    let moved = store.update_checklist(item.id, &patch, "alice").unwrap();

    assert_eq!(moved.issue_id, "issue-2");
    // Slot 1 is taken in the target list.
    assert_eq!(moved.position, 2);
}
