#![allow(dead_code)]

use checklist_rust::storage::SqliteStore;
use std::sync::Once;
use tempfile::TempDir;

pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(checklist_rust::logging::init_test_logging);
}

pub fn test_db() -> SqliteStore {
    init_test_logging();
    SqliteStore::open_memory().expect("Failed to create test database")
}

pub fn test_db_with_dir() -> (SqliteStore, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join(".ckl").join("checklists.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    let store = SqliteStore::open(&db_path).expect("Failed to create test database");
    (store, dir)
}
