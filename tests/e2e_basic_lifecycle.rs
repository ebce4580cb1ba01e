//! End-to-end lifecycle test against the real binary.
//!
//! init -> issue add -> add items -> check -> list -> search -> remove,
//! asserting the derived done ratio along the way.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ckl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ckl").expect("binary builds");
    cmd.current_dir(dir.path());
    cmd.env_remove("CKL_DIR");
    cmd.env_remove("CKL_DB");
    cmd.env_remove("CKL_LOG");
    cmd.env("CKL_ACTOR", "tester");
    cmd
}

#[test]
fn basic_lifecycle() {
    let dir = TempDir::new().unwrap();

    ckl(&dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized checklist workspace"));

    ckl(&dir)
        .args(["issue", "add", "Ship the release", "--id", "issue-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created issue-1"));

    for subject in ["tag the build", "update changelog", "announce"] {
        ckl(&dir)
            .args(["add", "issue-1", subject])
            .assert()
            .success()
            .stdout(predicate::str::contains(subject));
    }

    // Checking 1 of 3 items lands on the 30% decile, not 33%.
    ckl(&dir)
        .args(["check", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] tag the build"))
        .stdout(predicate::str::contains("done ratio: 30%"));

    ckl(&dir)
        .args(["list", "issue-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] tag the build"))
        .stdout(predicate::str::contains("[ ] update changelog"))
        .stdout(predicate::str::contains("1/3 done"));

    ckl(&dir)
        .args(["issue", "show", "issue-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30%"));

    ckl(&dir)
        .args(["search", "changelog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("update changelog"));

    ckl(&dir)
        .args(["activity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Issue: Ship the release"));

    // Removing an unchecked item leaves 1 of 2 done.
    ckl(&dir)
        .args(["remove", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 3"));

    ckl(&dir)
        .args(["recalc", "issue-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("done ratio: 50%"));
}

#[test]
fn init_twice_requires_force() {
    let dir = TempDir::new().unwrap();

    ckl(&dir).args(["init"]).assert().success();

    ckl(&dir)
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already_initialized"));

    ckl(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn unknown_item_error_is_structured() {
    let dir = TempDir::new().unwrap();

    ckl(&dir).args(["init"]).assert().success();

    // Piped stdout means errors come back as JSON on stderr.
    ckl(&dir)
        .args(["check", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checklist_not_found"));
}

#[test]
fn json_list_output_is_parseable() {
    let dir = TempDir::new().unwrap();

    ckl(&dir).args(["init"]).assert().success();
    ckl(&dir)
        .args(["issue", "add", "An issue", "--id", "issue-1"])
        .assert()
        .success();
    ckl(&dir)
        .args(["add", "issue-1", "a step"])
        .assert()
        .success();

    let output = ckl(&dir)
        .args(["--json", "list", "issue-1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let items: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["subject"], "a step");
}

#[test]
fn disabled_integration_skips_ratio_updates() {
    let dir = TempDir::new().unwrap();

    ckl(&dir).args(["init"]).assert().success();
    ckl(&dir)
        .args(["issue", "add", "An issue", "--id", "issue-1"])
        .assert()
        .success();
    ckl(&dir)
        .args(["add", "issue-1", "a step"])
        .assert()
        .success();
    ckl(&dir)
        .args(["config", "set", "checklist_done_ratio", "false"])
        .assert()
        .success();

    ckl(&dir).args(["check", "1"]).assert().success();

    ckl(&dir)
        .args(["recalc", "issue-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}
