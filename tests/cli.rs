use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command that never touches the user's real settings file.
fn scanlabel(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scanlabel").unwrap();
    cmd.arg("--settings").arg(dir.path().join("settings.toml"));
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Background, one primary and one diacritic above it.
const COMPONENTS: &str = r#"[
  {"left": 0, "top": 0, "width": 200, "height": 100, "area": 15000},
  {"left": 10, "top": 10, "width": 50, "height": 20, "area": 900},
  {"left": 15, "top": 5, "width": 5, "height": 5, "area": 150}
]"#;

/// Two columns; storage order is deliberately not reading order.
const BOXES: &str = r#"[
  {"id": 1, "x": 100, "y": 0, "w": 20, "h": 20, "class": "PrimarySubject"},
  {"id": 2, "x": 0, "y": 50, "w": 20, "h": 20},
  {"id": 3, "x": 0, "y": 0, "w": 20, "h": 20, "class": "FrameRegion"}
]"#;

fn ids_in(path: &Path) -> Vec<u64> {
    scanlabel::ir::io_json::read_boxes_json(path)
        .unwrap()
        .iter()
        .map(|b| b.id().as_u64())
        .collect()
}

/// Minimal PNG header: signature plus an IHDR chunk.
fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("scanlabel").unwrap();
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("scanlabel --help"));
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("scanlabel").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("scanlabel 0.1.0\n");
}

// Merge subcommand tests

#[test]
fn merge_writes_boxes_and_report() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "components.json", COMPONENTS);
    let output = dir.path().join("boxes.json");

    scanlabel(&dir)
        .args(["merge"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 component(s) into 1 box(es)"))
        .stdout(predicate::str::contains("diacritics merged:  1"));

    let boxes = scanlabel::ir::io_json::read_boxes_json(&output).unwrap();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].id().as_u64(), 1);
    assert_eq!(boxes[0].rect().x, 8.0);
    assert_eq!(boxes[0].rect().w, 54.0);
}

#[test]
fn merge_prints_json_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "components.json", COMPONENTS);

    scanlabel(&dir)
        .arg("merge")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"class\": \"PrimarySubject\""))
        .stderr(predicate::str::contains("Merged 2 component(s)"));
}

#[test]
fn merge_respects_settings_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "settings.toml", "[crop]\npadding = 0.0\n");
    let input = write(&dir, "components.json", COMPONENTS);

    scanlabel(&dir)
        .arg("merge")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"w\": 50.0"));
}

#[test]
fn merge_rejects_malformed_components() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "components.json", "{not json");

    scanlabel(&dir)
        .arg("merge")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse components JSON"));
}

// Order subcommand tests

#[test]
fn order_sorts_column_major() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);
    let output = dir.path().join("ordered.json");

    scanlabel(&dir)
        .arg("order")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(ids_in(&output), vec![3, 2, 1]);
    assert_eq!(ids_in(&input), vec![1, 2, 3]);
}

#[test]
fn order_rejects_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "boxes.json",
        r#"[{"id": 1, "x": 0, "y": 0, "w": 5, "h": 5}, {"id": 1, "x": 9, "y": 0, "w": 5, "h": 5}]"#,
    );

    scanlabel(&dir)
        .arg("order")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid box set"));
}

// Tag subcommand tests

#[test]
fn tag_assigns_then_clears_in_place() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("tag")
        .arg(&input)
        .args(["--ids", "1,2", "--class", "secondary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tagged 2 box(es) as SecondaryMark"));

    let content = fs::read_to_string(&input).unwrap();
    assert_eq!(content.matches("SecondaryMark").count(), 2);
    assert!(content.contains("FrameRegion"));

    scanlabel(&dir)
        .arg("tag")
        .arg(&input)
        .args(["--ids", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared class on 1 box(es)"));

    let content = fs::read_to_string(&input).unwrap();
    assert_eq!(content.matches("SecondaryMark").count(), 1);
}

#[test]
fn tag_prints_class_counts() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("tag")
        .arg(&input)
        .args(["--ids", "1", "--class", "secondary"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Class counts: untagged=1, SecondaryMark=1, FrameRegion=1",
        ));

    scanlabel(&dir)
        .arg("tag")
        .arg(&input)
        .args(["--ids", "2,3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Class counts: untagged=2, SecondaryMark=1"));
}

#[test]
fn tag_warns_about_unknown_ids() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("tag")
        .arg(&input)
        .args(["--ids", "3,42", "--class", "frame"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 id(s) did not match"));
}

#[test]
fn tag_rejects_unknown_class() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("tag")
        .arg(&input)
        .args(["--ids", "1", "--class", "stamp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported class"));

    assert_eq!(fs::read_to_string(&input).unwrap(), BOXES);
}

// Export subcommand tests

#[test]
fn export_with_explicit_dimensions() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("export")
        .arg(&input)
        .args(["--filename", "page.png", "--width", "200", "--height", "100"])
        .assert()
        .success()
        .stdout(
            "filename,class,x_center,y_center,width,height\n\
             page.png,FrameRegion,0.050000,0.100000,0.100000,0.200000\n\
             page.png,,0.050000,0.600000,0.100000,0.200000\n\
             page.png,PrimarySubject,0.550000,0.100000,0.100000,0.200000\n",
        );
}

#[test]
fn export_reads_dimensions_from_image() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);
    let image = dir.path().join("scan-01.png");
    fs::write(&image, png_header(200, 100)).unwrap();
    let output = dir.path().join("labels.csv");

    scanlabel(&dir)
        .arg("export")
        .arg(&input)
        .arg("--image")
        .arg(&image)
        .args(["--exclude", "2"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().skip(1).all(|l| l.starts_with("scan-01.png,")));
    assert!(!csv.ends_with('\n'));
}

#[test]
fn export_fails_when_everything_is_excluded() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("export")
        .arg(&input)
        .args(["--filename", "p.png", "--width", "10", "--height", "10"])
        .args(["--exclude", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No boxes to export"));
}

#[test]
fn export_requires_dimensions() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "boxes.json", BOXES);

    scanlabel(&dir)
        .arg("export")
        .arg(&input)
        .args(["--filename", "p.png"])
        .assert()
        .failure();
}

// Settings subcommand tests

#[test]
fn settings_path_reports_override() {
    let dir = TempDir::new().unwrap();
    scanlabel(&dir)
        .args(["settings", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.toml"));
}

#[test]
fn settings_reset_then_show() {
    let dir = TempDir::new().unwrap();
    write(&dir, "settings.toml", "[filter]\narea_lower = 700\n");

    scanlabel(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("area_lower = 700"));

    scanlabel(&dir)
        .args(["settings", "reset"])
        .assert()
        .success();

    scanlabel(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("area_lower = 500"))
        .stdout(predicate::str::contains("block_size = 15"));
}

#[test]
fn settings_show_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    write(&dir, "settings.toml", "[binarize]\nblock_size = 4\n");

    scanlabel(&dir)
        .args(["settings", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("block_size must be odd"));
}
