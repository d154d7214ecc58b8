//! End-to-end runs of the `punctalyzer` binary.

#![allow(deprecated)] // Command::cargo_bin

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use punctalyzer::chart::fonts::system_font_available;
use std::fs;
use tempfile::TempDir;

fn punctalyzer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("punctalyzer").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_args_shows_usage() {
    let dir = TempDir::new().unwrap();
    punctalyzer(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: punctalyzer"));
}

#[test]
fn list_categories_prints_all_keys_in_order() {
    let dir = TempDir::new().unwrap();
    let assert = punctalyzer(&dir).arg("--list-categories").assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let keys: Vec<&str> = stdout.lines().collect();
    assert_eq!(keys.len(), 18);
    assert_eq!(keys[0], "apostrophes");
    assert_eq!(keys[9], "full_stops");
    assert_eq!(keys[17], "vertical_bars");
}

#[test]
fn generate_config_writes_toml() {
    let dir = TempDir::new().unwrap();
    punctalyzer(&dir)
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("punctalyzer.toml"));

    let content = fs::read_to_string(dir.path().join("punctalyzer.toml")).unwrap();
    assert!(content.contains("[chart]"));
    assert!(content.contains("commas"));
}

#[test]
fn single_document_writes_csv() {
    let dir = TempDir::new().unwrap();
    common::write_docx(
        &dir.path().join("essay.docx"),
        &["He said, \"Hi!\" — wasn't that odd?"],
    );

    punctalyzer(&dir)
        .args(["essay.docx", "--no-chart", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "filename,word_count,apostrophes,colons,commas",
        ));

    let csv = fs::read_to_string(dir.path().join("punctuation_report/punctuation_summary.csv"))
        .unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("filename,word_count,"));
    // "wasn't" is two words
    assert!(lines.next().unwrap().starts_with("essay.docx,7,1,0,1,"));

    assert!(dir
        .path()
        .join("punctuation_report/punctuation_report.json")
        .exists());
    assert!(!dir
        .path()
        .join("punctuation_report/punctuation_graph.png")
        .exists());
}

#[test]
fn empty_directory_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();

    punctalyzer(&dir).arg("empty").assert().success();
    assert!(!dir.path().join("punctuation_report").exists());
}

#[test]
fn corrupt_document_is_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    common::write_docx(&docs.join("a_good.docx"), &["Fine, thanks."]);
    fs::write(docs.join("b_broken.docx"), b"this is not a zip archive").unwrap();
    common::write_docx(&docs.join("c_good.docx"), &["Also fine."]);

    punctalyzer(&dir)
        .args(["docs", "--no-chart", "--no-json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("b_broken.docx"));

    let csv = fs::read_to_string(dir.path().join("punctuation_report/punctuation_summary.csv"))
        .unwrap();
    let names: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(names, vec!["a_good.docx", "c_good.docx"]);
}

#[test]
fn missing_input_exits_with_path_error() {
    let dir = TempDir::new().unwrap();
    punctalyzer(&dir)
        .arg("nowhere.docx")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nowhere.docx"));
}

#[test]
fn unsupported_file_exits_with_path_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "plain text").unwrap();
    punctalyzer(&dir).arg("notes.txt").assert().code(3);
}

#[test]
fn unknown_category_exits_with_config_error() {
    let dir = TempDir::new().unwrap();
    common::write_docx(&dir.path().join("doc.docx"), &["Text."]);
    punctalyzer(&dir)
        .args(["doc.docx", "--select", "commas,tildes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("tildes"));
}

#[test]
fn existing_artifact_needs_force() {
    let dir = TempDir::new().unwrap();
    common::write_docx(&dir.path().join("doc.docx"), &["Once, twice."]);

    punctalyzer(&dir)
        .args(["doc.docx", "--no-chart", "-q"])
        .assert()
        .success();
    punctalyzer(&dir)
        .args(["doc.docx", "--no-chart", "-q"])
        .assert()
        .code(5);
    punctalyzer(&dir)
        .args(["doc.docx", "--no-chart", "-q", "--force"])
        .assert()
        .success();
}

#[test]
fn dry_run_lists_documents_only() {
    let dir = TempDir::new().unwrap();
    common::write_docx(&dir.path().join("draft.docx"), &["Draft."]);

    punctalyzer(&dir)
        .args(["draft.docx", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft.docx"));
    assert!(!dir.path().join("punctuation_report").exists());
}

#[test]
fn missing_font_exits_before_writing() {
    let dir = TempDir::new().unwrap();
    common::write_docx(&dir.path().join("doc.docx"), &["Text, here."]);

    punctalyzer(&dir)
        .args(["doc.docx", "--font", "no-such-font.ttf"])
        .assert()
        .code(6);
    assert!(!dir.path().join("punctuation_report").exists());
}

#[test]
fn single_document_draws_bar_chart() {
    if !system_font_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    common::write_docx(&dir.path().join("essay.docx"), &["One, two. Three?"]);

    punctalyzer(&dir).arg("essay.docx").assert().success();

    let out = dir.path().join("punctuation_report");
    let png = fs::read(out.join("punctuation_graph.png")).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
    let svg = fs::read_to_string(out.join("punctuation_graph.svg")).unwrap();
    assert!(svg.contains("Punctuation Count for: essay.docx"));
}

#[test]
fn several_documents_draw_line_chart() {
    if !system_font_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    common::write_docx(&dir.path().join("part_1.docx"), &["One, two."]);
    common::write_docx(&dir.path().join("part_2.docx"), &["Three; four!"]);

    punctalyzer(&dir)
        .args(["part_1.docx", "part_2.docx", "--chart-only", "-s", "commas"])
        .assert()
        .success();

    let out = dir.path().join("punctuation_report");
    assert!(!out.join("punctuation_summary.csv").exists());
    let svg = fs::read_to_string(out.join("punctuation_graph.svg")).unwrap();
    assert!(svg.contains("Punctuation Count Comparison"));
    assert!(svg.contains("part 1"));
}
