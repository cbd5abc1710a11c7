use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn gavel_cmd() -> Command {
    Command::cargo_bin("gavel").unwrap()
}

#[test]
fn test_rules_lists_bundled_ruleset() {
    gavel_cmd()
        .args(["rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("known-problematic rules"))
        .stdout(predicate::str::contains("commons-logging:commons-logging"))
        .stdout(predicate::str::contains("log4j:log4j"));
}

#[test]
fn test_rules_json_output_is_parseable() {
    let output = gavel_cmd().args(["rules", "--json"]).output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = parsed["knownProblematic"].as_array().unwrap();
    assert!(!rules.is_empty());
    assert!(rules.iter().all(|r| r["severity"].is_string()));
}
