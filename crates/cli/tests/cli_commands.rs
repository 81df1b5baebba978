use std::fs;
use std::path::Path;

use predicates::prelude::*;
use tempfile::tempdir;

/// Lay out a minimal project under `root`: an active program file, an
/// inactive one, and a deploy directory with a single artifact.
fn write_project(root: &Path, artifact: &[u8]) {
    let programs = root.join("programs");
    let deploy = root.join("target").join("deploy");
    fs::create_dir_all(&programs).unwrap();
    fs::create_dir_all(&deploy).unwrap();

    fs::write(
        programs.join("vault.rs"),
        "#[program]\npub mod vault {\n    pub fn initialize_vault(ctx: Ctx) -> R {}\n}\n",
    )
    .unwrap();
    fs::write(
        programs.join("legacy.rs"),
        "// #[program]\npub mod legacy {\n    pub fn ignored(ctx: Ctx) -> R {}\n}\n",
    )
    .unwrap();
    fs::write(deploy.join("vault.so"), artifact).unwrap();
}

/// `scan` should list the canonical names from active files only.
#[test]
fn scan_lists_active_instructions() {
    let dir = tempdir().expect("tempdir");
    write_project(dir.path(), b"unused");

    assert_cmd::cargo::cargo_bin_cmd!("ix-scrub")
        .current_dir(dir.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("InitializeVault"))
        .stdout(predicate::str::contains("Ignored").not());
}

/// `scan --json` should emit the serialized extraction.
#[test]
fn scan_json_emits_structured_output() {
    let dir = tempdir().expect("tempdir");
    write_project(dir.path(), b"unused");

    assert_cmd::cargo::cargo_bin_cmd!("ix-scrub")
        .current_dir(dir.path())
        .arg("scan")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"InitializeVault\""));
}

/// `scan` over a tree with only commented markers must exit non-zero.
#[test]
fn scan_fails_when_nothing_is_active() {
    let dir = tempdir().expect("tempdir");
    let programs = dir.path().join("programs");
    fs::create_dir_all(&programs).unwrap();
    fs::write(
        programs.join("disabled.rs"),
        "/// #[program]\npub mod vault {\n    pub fn initialize_vault(ctx: Ctx) -> R {}\n}\n",
    )
    .unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("ix-scrub")
        .current_dir(dir.path())
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No instruction declarations"));
}

/// `patch` should report scrubbed and not-found names per artifact.
#[test]
fn patch_reports_per_name_outcomes() {
    let dir = tempdir().expect("tempdir");
    write_project(dir.path(), b"head Instruction: InitializeVault tail");

    assert_cmd::cargo::cargo_bin_cmd!("ix-scrub")
        .current_dir(dir.path())
        .arg("patch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scrubbed: Instruction: InitializeVault"))
        .stdout(predicate::str::contains("Wrote patched artifact."))
        .stdout(predicate::str::contains("Patched 1 of 1 artifact(s)."));
}

/// `patch` against an empty deploy directory must fail before any patching.
#[test]
fn patch_fails_when_deploy_dir_is_empty() {
    let dir = tempdir().expect("tempdir");
    write_project(dir.path(), b"unused");
    fs::remove_file(dir.path().join("target").join("deploy").join("vault.so")).unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("ix-scrub")
        .current_dir(dir.path())
        .arg("patch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No .so artifacts"));
}

/// `patch --dry-run` must leave the artifact bytes untouched on disk.
#[test]
fn patch_dry_run_does_not_write() {
    let dir = tempdir().expect("tempdir");
    let artifact = b"Instruction: InitializeVault\x00tail".to_vec();
    write_project(dir.path(), &artifact);

    assert_cmd::cargo::cargo_bin_cmd!("ix-scrub")
        .current_dir(dir.path())
        .arg("patch")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run; artifact left untouched on disk."));

    let on_disk = fs::read(dir.path().join("target").join("deploy").join("vault.so")).unwrap();
    assert_eq!(on_disk, artifact);
}
