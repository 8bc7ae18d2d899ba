use std::process::Command;

use assert_cmd::prelude::*;

fn qasheet() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qasheet"));
    cmd.env_remove("QASHEET_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let assert = cmd.assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn generate_then_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("qa.xlsx");

    let stdout = stdout_of(qasheet().arg("generate").arg("--output").arg(&output));
    assert!(stdout.contains("✅ Spreadsheet created!"), "stdout:\n{stdout}");
    assert!(output.exists());

    let listing = stdout_of(qasheet().arg("inspect").arg(&output));
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 13, "stdout:\n{listing}");
    assert_eq!(lines[0], "Summary\t18");
    assert_eq!(lines[2], "2. Marathon\t19");
    assert_eq!(lines[12], "Bugs\t5");
}

#[test]
fn regenerating_an_existing_file_is_byte_stable() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("qa.xlsx");

    qasheet().arg("generate").arg("-o").arg(&output).assert().success();
    let first = std::fs::read(&output).unwrap();
    qasheet().arg("generate").arg("-o").arg(&output).assert().success();
    assert_eq!(std::fs::read(&output).unwrap(), first);
}

#[test]
fn russian_workbook_uses_localized_sheet_names() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("qa-ru.xlsx");

    let stdout = stdout_of(
        qasheet()
            .args(["generate", "--locale", "ru", "--output"])
            .arg(&output),
    );
    assert!(stdout.contains("✅ Таблица создана!"), "stdout:\n{stdout}");

    let listing = stdout_of(qasheet().arg("inspect").arg(&output));
    assert!(listing.starts_with("Сводка\t18\n"), "stdout:\n{listing}");
    assert!(listing.contains("\nБаги\t5"), "stdout:\n{listing}");
}

#[test]
fn check_reports_builtin_catalog_as_consistent() {
    let stdout = stdout_of(qasheet().arg("check"));
    assert!(
        stdout.contains("OK: 11 section(s), 123 scenario(s), declared total 123"),
        "stdout:\n{stdout}"
    );

    let json = stdout_of(qasheet().args(["check", "--locale", "ru", "--format", "json"]));
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["locale"], "ru");
    assert_eq!(report["scenarios"], 123);
    assert_eq!(report["issues"], serde_json::json!([]));
}

#[test]
fn inconsistent_catalog_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.json");
    std::fs::write(
        &catalog,
        r#"{"locale": "en", "total": 3, "sections": [{"name": "Smoke", "total": 2,
            "scenarios": [{"id": "1.1", "name": "Start", "expected": "Greeting"}]}]}"#,
    )
    .unwrap();

    let assert = qasheet()
        .arg("check")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(
        stdout.contains("declares 2 scenario(s) but lists 1"),
        "stdout:\n{stdout}"
    );

    let output = dir.path().join("qa.xlsx");
    qasheet()
        .arg("generate")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure();
    assert!(!output.exists());
}

#[test]
fn inspect_json_dumps_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("qa.xlsx");
    qasheet().arg("generate").arg("-o").arg(&output).assert().success();

    let json = stdout_of(
        qasheet()
            .arg("inspect")
            .arg(&output)
            .args(["--format", "json"]),
    );
    let model: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(model["sheets"].as_array().map(Vec::len), Some(13));
    assert_eq!(model["sheets"][0]["name"], "Summary");
}
