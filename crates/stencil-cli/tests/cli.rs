use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn template_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("templates")
}

/// `stencil` pointed at the shipped templates and a throwaway preset file
fn stencil(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stencil").unwrap();
    cmd.env_remove("STENCIL_TEMPLATE_DIR")
        .env_remove("RUST_LOG")
        .arg("--template-dir")
        .arg(template_root())
        .arg("--preset-file")
        .arg(home.path().join(".stencil.preset"));
    cmd
}

#[test]
fn test_preset_ls_empty() {
    let home = tempfile::tempdir().unwrap();
    stencil(&home)
        .args(["preset", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<no custom preset>"));

    // the store is created on first use
    assert!(home.path().join(".stencil.preset").is_file());
}

#[test]
fn test_preset_ls_all_lists_builtins() {
    let home = tempfile::tempdir().unwrap();
    stencil(&home)
        .args(["preset", "ls", "-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Default] @projects/cpp/console"))
        .stdout(predicate::str::contains("[Default] @types/h"));
}

#[test]
fn test_preset_cat_builtin() {
    let home = tempfile::tempdir().unwrap();
    stencil(&home)
        .args(["preset", "cat", "@projects/cpp/console"])
        .assert()
        .success()
        .stdout(predicate::str::contains("template: projects/cpp/console"))
        .stdout(predicate::str::contains("type: project"))
        .stdout(predicate::str::contains("cmakeMinimum"));
}

#[test]
fn test_preset_listing_reads_store() {
    let home = tempfile::tempdir().unwrap();
    fs::write(
        home.path().join(".stencil.preset"),
        "version: \"1\"\nitems:\n  - name: mine\n    type: project\n    template: projects/cpp/console\n    options:\n      cxxStandard: \"20\"\n",
    )
    .unwrap();

    stencil(&home)
        .args(["preset", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mine -> @projects/cpp/console"));

    stencil(&home)
        .args(["preset", "mv", "mine", "yours"])
        .assert()
        .success();

    stencil(&home)
        .args(["preset", "cat", "yours"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: yours"));
}

#[test]
fn test_unknown_preset_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    stencil(&home)
        .current_dir(work.path())
        .args(["new", "demo", "--preset", "@nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("cannot find default preset"));

    assert!(!work.path().join("demo").exists());
}

#[test]
fn test_rename_missing_preset() {
    let home = tempfile::tempdir().unwrap();
    stencil(&home)
        .args(["preset", "mv", "ghost", "other"])
        .assert()
        .code(3);
}

#[test]
fn test_new_dry_run_writes_nothing() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    stencil(&home)
        .current_dir(work.path())
        .args(["new", "demo", "--preset", "@projects/cpp/console", "--dry-run"])
        .assert()
        .success();

    assert!(!work.path().join("demo").exists());
}

#[test]
fn test_new_project() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    stencil(&home)
        .current_dir(work.path())
        .args(["new", "demo", "--preset", "@projects/cpp/console"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cd ./demo").or(predicate::str::contains("cd demo")));

    let cmake = fs::read_to_string(work.path().join("demo/CMakeLists.txt")).unwrap();
    assert!(cmake.contains("project(demo LANGUAGES CXX)"));
    assert!(work.path().join("demo/main.cpp").is_file());

    // a second run refuses to touch the existing directory
    stencil(&home)
        .current_dir(work.path())
        .args(["new", "demo", "--preset", "@projects/cpp/console"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_project_name() {
    let home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    stencil(&home)
        .current_dir(work.path())
        .args(["new", "a:b", "--preset", "@projects/cpp/console"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a valid directory name"));
}

#[test]
fn test_default_answers() {
    let home = tempfile::tempdir().unwrap();
    stencil(&home)
        .args(["test", "default", "@files/cpp/class"])
        .assert()
        .success()
        .stdout(predicate::str::contains("className: MyClass"))
        .stdout(predicate::str::contains("createSource: true"));
}

#[test]
fn test_default_requires_builtin_name() {
    let home = tempfile::tempdir().unwrap();
    stencil(&home)
        .args(["test", "default", "files/cpp/class"])
        .assert()
        .code(3);
}
