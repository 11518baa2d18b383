use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn footprint() -> Command {
    let mut cmd = Command::cargo_bin("footprint").expect("binary builds");
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn test_list_modules() {
    footprint()
        .arg("--list-modules")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available modules:"))
        .stdout(predicate::str::contains("whois"))
        .stdout(predicate::str::contains("ip_intel"));
}

#[test]
fn test_missing_arguments_print_usage() {
    footprint()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--module and --target"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_module_fails() {
    footprint()
        .args(["-m", "telepathy", "-t", "example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown module"));
}

#[test]
fn test_invalid_email_fails() {
    footprint()
        .args(["-m", "email", "-t", "not-an-email"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_zero_budget_fails() {
    footprint()
        .args(["-m", "domain", "-t", "example.com", "--budget-ms", "0"])
        .assert()
        .code(1);
}

#[test]
fn test_json_email_report() {
    let output = footprint()
        .args(["--json", "-m", "email", "-t", "alice@example.com"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["target"], "alice@example.com");
    assert_eq!(doc["overall_status"], "complete");
    let collectors: Vec<&str> = doc["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["collector"].as_str().unwrap())
        .collect();
    assert_eq!(collectors, vec!["breach", "paste", "social", "domain_metadata"]);
}

#[test]
fn test_plain_text_report() {
    footprint()
        .args(["-m", "whois", "-t", "example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Investigation of example.com"))
        .stdout(predicate::str::contains("== whois =="));
}

#[test]
fn test_report_file_is_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");

    footprint()
        .args(["-m", "dns", "-t", "example.com", "-o"])
        .arg(&path)
        .assert()
        .success();

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["outcomes"][0]["collector"], "dns");
    assert_eq!(doc["outcomes"][0]["status"], "ok");
}

#[test]
fn test_interactive_session() {
    footprint()
        .arg("--interactive")
        .write_stdin("help\nwhois --target example.com\nbogus -t x\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("== whois =="))
        .stdout(predicate::str::contains("unknown module"))
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn test_auto_module_accepts_company_with_colon() {
    footprint()
        .args(["-m", "auto", "-t", "Acme: Widgets Inc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== company =="));
}
