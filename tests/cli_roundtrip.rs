use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn deck(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("promptdeck").unwrap();
    cmd.env("PROMPTDECK_HOME", home);
    cmd
}

#[test]
fn fresh_store_seeds_the_sample_library() {
    let home = tempfile::tempdir().unwrap();

    deck(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Work / InfoSec"))
        .stdout(predicates::str::contains("First-principles explanation"));
}

#[test]
fn category_and_prompt_lifecycle() {
    let home = tempfile::tempdir().unwrap();

    deck(home.path())
        .args(["cat", "add", "Recipes"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Created category \"Recipes\""));

    // categories resolve by name as well as id
    deck(home.path())
        .args(["add", "Recipes", "Pasta", "Boil the water first."])
        .assert()
        .success()
        .stdout(predicates::str::contains("Prompt created: Pasta"));

    deck(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Recipes"))
        .stdout(predicates::str::contains("Pasta"));

    deck(home.path())
        .args(["rm", "Pasta"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Prompt deleted: Pasta"));

    deck(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Pasta").not());
}

#[test]
fn create_with_empty_title_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    deck(home.path())
        .args(["add", "Scratch", "", "some body"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("title is required"));
}

#[test]
fn export_then_import_round_trips() {
    let home = tempfile::tempdir().unwrap();
    let export_path = home.path().join("library.json");

    deck(home.path())
        .args(["export", export_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("Exported to"));

    deck(home.path())
        .args(["reset", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Library cleared."));

    deck(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Nothing to list."));

    deck(home.path())
        .args(["import", export_path.to_str().unwrap(), "--yes"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Library replaced"));

    deck(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Risk summary (1 page)"));
}

#[test]
fn import_of_invalid_document_fails_without_touching_the_store() {
    let home = tempfile::tempdir().unwrap();
    let bad_path = home.path().join("bad.json");
    std::fs::write(&bad_path, r#"{"categories": "nope"}"#).unwrap();

    deck(home.path())
        .args(["import", bad_path.to_str().unwrap(), "--yes"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid library"));

    // the sample seed is still in place
    deck(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Work / InfoSec"));
}

#[test]
fn import_without_confirmation_is_cancelled() {
    let home = tempfile::tempdir().unwrap();
    let export_path = home.path().join("library.json");

    deck(home.path())
        .args(["export", export_path.to_str().unwrap()])
        .assert()
        .success();

    deck(home.path())
        .args(["import", export_path.to_str().unwrap()])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("Import cancelled."));
}

#[test]
fn insert_appends_into_the_target_file() {
    let home = tempfile::tempdir().unwrap();
    let target = home.path().join("composer.txt");

    deck(home.path())
        .args(["insert", "Blank scaffold", "--into", target.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("Inserted: Blank scaffold"));

    let first = std::fs::read_to_string(&target).unwrap();
    assert!(first.starts_with("Context:"));

    // a second insertion gets a blank-line separator
    deck(home.path())
        .args(["insert", "Blank scaffold", "--into", target.to_str().unwrap()])
        .assert()
        .success();

    let second = std::fs::read_to_string(&target).unwrap();
    assert!(second.contains("Question:\n\nContext:"));
}

#[test]
fn autosend_preference_round_trips() {
    let home = tempfile::tempdir().unwrap();

    deck(home.path())
        .arg("autosend")
        .assert()
        .success()
        .stdout(predicates::str::contains("auto-send: off"));

    deck(home.path())
        .args(["autosend", "on"])
        .assert()
        .success()
        .stdout(predicates::str::contains("auto-send: on"));

    deck(home.path())
        .arg("autosend")
        .assert()
        .success()
        .stdout(predicates::str::contains("auto-send: on"));
}

#[test]
fn checkpoint_save_and_list() {
    let home = tempfile::tempdir().unwrap();

    deck(home.path())
        .args([
            "ckpt",
            "save",
            "Scratch",
            "Where we left off",
            "Summarize the thread so far.",
            "--description",
            "mid-investigation",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("Checkpoint saved"));

    deck(home.path())
        .args(["list", "--checkpoints"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Where we left off"))
        .stdout(predicates::str::contains("mid-investigation"));
}
