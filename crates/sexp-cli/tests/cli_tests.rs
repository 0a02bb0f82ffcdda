//! Integration tests for the `sexp-tool` binary.
//!
//! Files are staged in a temporary directory so in-place runs never touch
//! anything shared.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SPRITE_V1: &str = r#"(supertux-sprite (name "x") (action (name "idle")) (action (name "walk")))"#;

const SPRITE_V2: &str = r#"(supertux-sprite
  (version 2)
  (name "x")
  (actions
    (action
      (name "idle")
    )
    (action
      (name "walk")
    )
  )
)
"#;

const LEVEL_V3: &str = r#"(supertux-level (sector (name "main") (init-script "") (spawnpoint "start")))"#;

/// Helper: write `content` to `name` inside `dir`.
fn stage(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("failed to stage fixture");
    path
}

fn tool() -> Command {
    Command::cargo_bin("sexp-tool").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// refactor
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn refactor_sprite_to_stdout() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "tux.sprite", SPRITE_V1);

    tool()
        .arg("refactor")
        .arg(&path)
        .assert()
        .success()
        .stdout(format!(";; {}\n{}", path.display(), SPRITE_V2));

    // stdout mode leaves the file alone
    assert_eq!(fs::read_to_string(&path).unwrap(), SPRITE_V1);
}

#[test]
fn refactor_level_to_stdout() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "intro.stl", LEVEL_V3);

    tool()
        .arg("refactor")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(version 4)"))
        .stdout(predicate::str::contains(
            "      (objects\n        (spawnpoint \"start\")\n      )",
        ));
}

#[test]
fn refactor_in_place() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "tux.sprite", SPRITE_V1);

    tool()
        .args(["refactor", "--in-place"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("modifying in place"));

    assert_eq!(fs::read_to_string(&path).unwrap(), SPRITE_V2);
}

#[test]
fn in_place_leaves_no_stray_files() {
    let dir = TempDir::new().unwrap();
    let sprite = stage(&dir, "tux.sprite", SPRITE_V1);
    let level = stage(&dir, "intro.stl", LEVEL_V3);

    tool()
        .args(["refactor", "--in-place"])
        .arg(&sprite)
        .arg(&level)
        .assert()
        .success();

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["intro.stl", "tux.sprite"]);
    assert_eq!(fs::read_to_string(&sprite).unwrap(), SPRITE_V2);
}

#[test]
fn refactor_custom_indent() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "tux.sprite", SPRITE_V1);

    tool()
        .args(["refactor", "--indent", "4"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\n    (version 2)\n"));
}

#[test]
fn refactor_rejects_zero_indent() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "tux.sprite", SPRITE_V1);

    tool()
        .args(["refactor", "--indent", "0"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn refactor_requires_files() {
    tool().arg("refactor").assert().failure();
}

#[test]
fn malformed_file_is_not_written() {
    let dir = TempDir::new().unwrap();
    let broken = r#"(supertux-sprite (name "x")"#;
    let path = stage(&dir, "broken.sprite", broken);

    tool()
        .args(["refactor", "--in-place"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unbalanced parenthesis"))
        .stdout(predicate::str::contains("modifying in place").not());

    assert_eq!(fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn unhandled_file_type() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "notes.txt", "(supertux-sprite)");

    tool()
        .arg("refactor")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unhandled file type"));
}

#[test]
fn wrong_root_tag_for_extension() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "mislabeled.stl", SPRITE_V1);

    tool()
        .arg("refactor")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("supertux-level"));
}

#[test]
fn batch_continues_past_failures() {
    let dir = TempDir::new().unwrap();
    let bad = stage(&dir, "bad.sprite", "(supertux-sprite");
    let good = stage(&dir, "good.sprite", SPRITE_V1);
    let level = stage(&dir, "level.stl", LEVEL_V3);

    tool()
        .args(["refactor", "--in-place"])
        .arg(&bad)
        .arg(&good)
        .arg(&level)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.sprite"))
        .stderr(predicate::str::contains("1 of 3 file(s) failed"));

    assert_eq!(fs::read_to_string(&good).unwrap(), SPRITE_V2);
    assert!(fs::read_to_string(&level).unwrap().contains("(version 4)"));
}

#[test]
fn stdout_keeps_file_order() {
    let dir = TempDir::new().unwrap();
    let first = stage(&dir, "b.sprite", SPRITE_V1);
    let second = stage(&dir, "a.stl", LEVEL_V3);

    let output = tool()
        .arg("refactor")
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first_at = stdout.find(&format!(";; {}", first.display())).unwrap();
    let second_at = stdout.find(&format!(";; {}", second.display())).unwrap();
    assert!(first_at < second_at);
}

#[test]
fn already_migrated_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "tux.sprite", SPRITE_V2);

    tool()
        .args(["refactor", "--in-place"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped"));

    assert_eq!(fs::read_to_string(&path).unwrap(), SPRITE_V2);
}

// ─────────────────────────────────────────────────────────────────────────────
// format and dump
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_without_migrating() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "data.txt", "(config (volume 10) (fullscreen #f))");

    tool()
        .arg("format")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "(config\n  (volume 10)\n  (fullscreen #f)\n)\n",
        ))
        .stdout(predicate::str::contains("version").not());
}

#[test]
fn format_rejects_two_expressions() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "two.sprite", "(a) (b)");

    tool()
        .arg("format")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("found 2"));
}

#[test]
fn dump_json() {
    let dir = TempDir::new().unwrap();
    let path = stage(&dir, "w.stl", "(width 3)");

    let output = tool().arg("dump").arg(&path).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "list");
    assert_eq!(json["value"][0]["value"], "width");
    assert_eq!(json["value"][1]["value"], 3);
}

#[test]
fn missing_file() {
    tool()
        .args(["dump", "/nonexistent/file.stl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}
