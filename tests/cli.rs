use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sheet2pdf() -> Command {
    Command::cargo_bin("sheet2pdf").unwrap()
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"PK").unwrap();
}

#[test]
fn start_without_folder_is_rejected() {
    sheet2pdf()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Select the folder"));
}

#[test]
fn missing_folder_is_rejected() {
    let dir = TempDir::new().unwrap();

    sheet2pdf()
        .arg(dir.path().join("not-there"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer exists"));
}

#[test]
fn folder_without_workbooks_reports_nothing_to_convert() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "old/legacy.xls");

    sheet2pdf()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No .xlsx files to convert"));
}

#[test]
fn dry_run_lists_nested_workbooks_only() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "top.xlsx");
    touch(dir.path(), "a/b/deep.XLSX");
    touch(dir.path(), "a/readme.md");

    sheet2pdf()
        .arg("--dry-run")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files would be converted"))
        .stdout(predicate::str::contains("deep.XLSX"))
        .stdout(predicate::str::contains("readme.md").not());

    assert!(!dir.path().join("top.pdf").exists());
}

#[test]
fn example_config_round_trips_through_validation() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("sheet2pdf.toml");

    sheet2pdf()
        .args(["example-config", "--output"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.is_file());

    sheet2pdf()
        .arg("config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn relative_converter_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a.xlsx");

    sheet2pdf()
        .args(["--soffice", "soffice"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));
}

#[cfg(unix)]
mod with_fake_converter {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Mimics `soffice --headless --convert-to pdf --outdir DIR FILE`;
    /// records each call in DIR/calls.log, exits 3 for files starting with
    /// "fail" and writes nothing for "ghost"
    const FAKE_SOFFICE: &str = r#"#!/bin/sh
for last; do :; done
shift 4
out="$1"
base=$(basename "$last")
echo "$base" >> "$out/calls.log"
case "$base" in
  fail*) exit 3 ;;
  ghost*) exit 0 ;;
esac
touch "$out/${base%.*}.pdf"
"#;

    fn install_fake(dir: &TempDir) -> std::path::PathBuf {
        let bin = dir.path().join("Libre Office");
        fs::create_dir_all(&bin).unwrap();
        let fake = bin.join("soffice");
        fs::write(&fake, FAKE_SOFFICE).unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();
        fake
    }

    fn run_json(soffice: &Path, folder: &Path) -> serde_json::Value {
        let output = sheet2pdf()
            .arg("--json")
            .arg("--soffice")
            .arg(soffice)
            .arg(folder)
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }

    #[test]
    fn every_workbook_gets_exactly_one_outcome() {
        let tools = TempDir::new().unwrap();
        let soffice = install_fake(&tools);
        let data = TempDir::new().unwrap();
        touch(data.path(), "ok.xlsx");
        touch(data.path(), "2024 결산/summary (v2).xlsx");
        touch(data.path(), "nested/fail-locked.xlsx");
        touch(data.path(), "nested/ghost.xlsx");
        touch(data.path(), "nested/ignore.csv");

        let report = run_json(&soffice, data.path());

        assert_eq!(report["summary"]["total"], 4);
        assert_eq!(report["summary"]["success"], 2);
        assert_eq!(report["summary"]["failed"], 2);
        assert_eq!(report["entries"].as_array().unwrap().len(), 4);
        assert!(data.path().join("ok.pdf").is_file());
        assert!(data.path().join("2024 결산/summary (v2).pdf").is_file());
        assert!(!data.path().join("nested/ghost.pdf").exists());

        let entries = report["entries"].as_array().unwrap();
        let ghost = entries
            .iter()
            .find(|e| e["file"].as_str().unwrap().ends_with("ghost.xlsx"))
            .unwrap();
        assert_eq!(ghost["outcome"]["reason"]["kind"], "output_missing");
        assert!(entries
            .iter()
            .all(|e| !e["file"].as_str().unwrap().ends_with(".csv")));
    }

    #[test]
    fn console_run_prints_log_and_summary() {
        let tools = TempDir::new().unwrap();
        let soffice = install_fake(&tools);
        let data = TempDir::new().unwrap();
        touch(data.path(), "ok.xlsx");
        touch(data.path(), "fail.xlsx");

        sheet2pdf()
            .arg("--soffice")
            .arg(&soffice)
            .arg(data.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Success: "))
            .stdout(predicate::str::contains("exit status 3"))
            .stdout(predicate::str::contains("Conversion Summary"))
            .stdout(predicate::str::contains("ASCII-only"))
            .stderr(predicate::str::contains("Failed to convert").not());
    }

    #[test]
    fn missing_converter_fails_every_file_but_finishes() {
        let data = TempDir::new().unwrap();
        touch(data.path(), "a.xlsx");
        touch(data.path(), "b/b.xlsx");

        let report = run_json(Path::new("/nonexistent/libreoffice/soffice"), data.path());

        assert_eq!(report["summary"]["total"], 2);
        assert_eq!(report["summary"]["failed"], 2);
    }

    #[test]
    fn second_run_converts_again() {
        let tools = TempDir::new().unwrap();
        let soffice = install_fake(&tools);
        let data = TempDir::new().unwrap();
        touch(data.path(), "again.xlsx");

        let first = run_json(&soffice, data.path());
        assert!(data.path().join("again.pdf").is_file());
        let second = run_json(&soffice, data.path());

        assert_eq!(first["summary"]["success"], 1);
        assert_eq!(second["summary"]["success"], 1);
        let calls = fs::read_to_string(data.path().join("calls.log")).unwrap();
        assert_eq!(calls.lines().count(), 2);
    }
}
