//! End-to-end tests for the `formcheck` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SIGNUP_PLAN: &str = r#"
[[fields]]
field = "email"
rules = [
    { rule = "required" },
    { rule = "email", message = "That does not look like an e-mail" },
    { rule = "to_lower" },
]

[[fields]]
field = "age"
rules = [
    { rule = "when", field = "country", value = "us" },
    { rule = "integer" },
    { rule = "min_value", min = 21 },
]

[[fields]]
field = "tags"
rules = [{ rule = "is_in", value = ["news", "offers", "events"] }]
"#;

fn formcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("formcheck").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("FORMCHECK_CONFIG")
        .env_remove("FORMCHECK_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

fn workspace(form: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "plan.toml", SIGNUP_PLAN);
    write(&dir, "form.json", form);
    dir
}

#[test]
fn test_valid_submission_exits_zero() {
    let dir = workspace(r#"{"email": "Ann@Example.com", "age": 30, "country": "us", "tags": "news"}"#);

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.toml"])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn test_invalid_submission_exits_one_with_messages() {
    let dir = workspace(r#"{"email": "nope", "age": "19", "country": "us", "tags": "spam"}"#);

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.toml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("email: That does not look like an e-mail"))
        .stdout(predicate::str::contains("age: Please enter a value greater than 21"))
        .stdout(predicate::str::contains("tags: Value is not in"))
        .stdout(predicate::str::ends_with("invalid: 3 fields failed\n"));
}

#[test]
fn test_closed_gate_skips_field() {
    let dir = workspace(r#"{"email": "a@b.co", "age": "12", "country": "ca"}"#);

    formcheck(&dir)
        .args(["check", "-i", "form.json", "-r", "plan.toml", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""valid": true"#))
        .stdout(predicate::str::contains(r#""age": null"#));
}

#[test]
fn test_json_report_carries_transformed_values() {
    let dir = workspace(r#"{"email": "Ann@Example.COM", "tags": "x"}"#);

    let output = formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.toml", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["values"]["email"], "ann@example.com");
    assert_eq!(report["errors"]["tags"][0], "Value is not in");
}

#[test]
fn test_yaml_plan_and_stdin_input() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "plan.yaml",
        r"
fields:
  - field: password
    rules:
      - rule: min_size
        size: 8
  - field: confirm
    rules:
      - rule: equal
        field: password
        message: Passwords differ
",
    );

    formcheck(&dir)
        .args(["check", "--input", "-", "--rules", "plan.yaml"])
        .write_stdin(r#"{"password": "hunter22", "confirm": "hunter2"}"#)
        .assert()
        .code(1)
        .stdout("confirm: Passwords differ\ninvalid: 1 field failed\n");
}

#[test]
fn test_joiner_flag_joins_messages_of_one_field() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir,
        "plan.json",
        r#"{"fields": [{"field": "code", "rules": [
            {"rule": "alpha"},
            {"rule": "max_size", "size": 2}
        ]}]}"#,
    );
    write(&dir, "form.json", r#"{"code": "a1b2"}"#);

    // A failed rule does not stop the chain.
    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.json", "--joiner", " / "])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "code: Only letters are permitted / Please enter less than 2 characters\n",
        ));
}

#[test]
fn test_config_file_overrides_messages_and_format() {
    let dir = workspace(r#"{"email": ""}"#);
    write(
        &dir,
        "formcheck.toml",
        r#"
[output]
format = "json"

[messages]
required = "Fill this in"
"#,
    );

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.toml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Fill this in"))
        .stdout(predicate::str::contains(r#""valid": false"#));
}

#[test]
fn test_environment_overrides_config_file() {
    let dir = workspace(r#"{"email": ""}"#);
    write(&dir, "formcheck.toml", "[output]\nformat = \"json\"\n");

    formcheck(&dir)
        .env("FORMCHECK_OUTPUT__FORMAT", "text")
        .args(["check", "--input", "form.json", "--rules", "plan.toml"])
        .assert()
        .code(1)
        .stdout("email: This field is required\ninvalid: 1 field failed\n");
}

#[test]
fn test_flag_overrides_environment() {
    let dir = workspace(r#"{"email": "a@b.co"}"#);

    formcheck(&dir)
        .env("FORMCHECK_OUTPUT__FORMAT", "json")
        .args(["check", "--input", "form.json", "--rules", "plan.toml", "--format", "text"])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = workspace("{}");

    formcheck(&dir)
        .args(["--config", "absent.toml", "messages"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_bad_plan_reports_location() {
    let dir = workspace("{}");
    write(
        &dir,
        "broken.toml",
        "[[fields]]\nfield = \"a\"\nrules = [{ rule = \"equal\" }]\n",
    );

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "broken.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("field `a`, step 1"));
}

#[test]
fn test_unsupported_plan_extension() {
    let dir = workspace("{}");
    write(&dir, "plan.ini", "");

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.ini"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported rule plan"));
}

#[test]
fn test_submission_must_be_an_object() {
    let dir = workspace("[1, 2, 3]");

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "plan.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must be a JSON object"));
}

#[test]
fn test_messages_lists_catalog_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "formcheck.toml", "[messages]\nemail = \"Bad mail\"\n");

    formcheck(&dir)
        .arg("messages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bad mail"))
        .stdout(predicate::str::contains("This field is required"));
}

#[test]
fn test_messages_as_json() {
    let dir = tempfile::tempdir().unwrap();

    let output = formcheck(&dir).args(["messages", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let catalog: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(catalog["ip"], "Please enter a valid IP address");
}

#[test]
fn test_logs_go_to_stderr() {
    let dir = workspace(r#"{"email": "a@b.co"}"#);

    formcheck(&dir)
        .env("FORMCHECK_LOG", "debug")
        .args(["check", "--input", "form.json", "--rules", "plan.toml"])
        .assert()
        .success()
        .stdout("valid\n")
        .stderr(predicate::str::contains("check finished"));
}

#[test]
fn test_plan_file_must_exist() {
    let dir = workspace("{}");
    assert!(!dir.path().join("missing.toml").exists());

    formcheck(&dir)
        .args(["check", "--input", "form.json", "--rules", "missing.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read rule plan"));
}
