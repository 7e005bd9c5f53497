//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn scout_cmd(db_path: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("scout").unwrap();
    cmd.env("SCOUT_DB", db_path).env_remove("SCOUT_CONFIG");
    cmd
}

#[test]
fn test_taxonomy_lists_vocabulary() {
    let dir = tempfile::tempdir().unwrap();
    scout_cmd(&dir.path().join("creators.db"))
        .arg("taxonomy")
        .assert()
        .success()
        .stdout(predicate::str::contains("tech_gaming"))
        .stdout(predicate::str::contains("youtube"))
        .stdout(predicate::str::contains("micro"));
}

#[test]
fn test_short_query_reports_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    scout_cmd(&dir.path().join("creators.db"))
        .args(["search", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("query too short"));
}

#[test]
fn test_import_then_search_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("creators.db");

    let fixture = dir.path().join("creators.json");
    std::fs::write(
        &fixture,
        serde_json::to_string(&scout::test_utils::sample_creators()).unwrap(),
    )
    .unwrap();

    scout_cmd(&db_path)
        .args(["import", "--file"])
        .arg(&fixture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 5 creators"));

    let output = scout_cmd(&db_path)
        .args(["--machine", "search", "gaming creators", "--min-score", "0"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let response: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(response["success"], true);
    assert!(response["results"].as_array().is_some_and(|r| !r.is_empty()));
}

#[test]
fn test_suggest_command() {
    let dir = tempfile::tempdir().unwrap();
    scout_cmd(&dir.path().join("creators.db"))
        .args(["suggest", "gam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tech & Gaming creators"));
}
