#![allow(deprecated)] // TODO: move cargo_bin to the cargo_bin_cmd! macro

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fake CPI: numbered CIDs for create_stemcell, success for delete_stemcell
const FAKE_CPI: &str = r#"#!/bin/sh
dir=$(dirname "$0")
req=$(cat)
echo "$req" >> "$dir/requests.log"
case "$req" in
  *'"method":"create_stemcell"'*)
    n=$(( $(cat "$dir/counter" 2>/dev/null || echo 0) + 1 ))
    echo "$n" > "$dir/counter"
    printf '{"result":"cid-%s","error":null,"log":""}\n' "$n"
    ;;
  *'"method":"delete_stemcell"'*)
    printf '{"result":null,"error":null,"log":""}\n'
    ;;
  *)
    printf '{"result":null,"error":{"type":"Bosh::Clouds::NotImplemented","message":"unknown method","ok_to_retry":false},"log":""}\n'
    ;;
esac
"#;

struct TestProject {
    root: TempDir,
}

impl TestProject {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let project = Self { root };
        project.write_cpi();
        fs::write(project.config_path(), "cpi:\n  command: ./cpi\n").unwrap();
        project
    }

    #[cfg(unix)]
    fn write_cpi(&self) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.path().join("cpi");
        fs::write(&path, FAKE_CPI).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(not(unix))]
    fn write_cpi(&self) {}

    fn config_path(&self) -> PathBuf {
        self.root.path().join("stemward.yml")
    }

    fn write_stemcell(&self, name: &str, version: &str) -> PathBuf {
        let dir = self.root.path().join(format!("{}-{}", name, version));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("stemcell.MF"),
            format!(
                "name: {}\nversion: '{}'\ncloud_properties:\n  x: 1\n",
                name, version
            ),
        )
        .unwrap();
        fs::write(dir.join("image"), b"image-bytes").unwrap();
        dir
    }

    fn state_file(&self) -> PathBuf {
        self.root.path().join(".stemward").join("state.json")
    }

    fn requests(&self) -> String {
        fs::read_to_string(self.root.path().join("requests.log")).unwrap_or_default()
    }

    fn stemward(&self) -> Command {
        let mut cmd = Command::cargo_bin("stemward").unwrap();
        cmd.current_dir(self.root.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Help lists every subcommand
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("stemward").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("current"))
        .stdout(predicate::str::contains("unused"))
        .stdout(predicate::str::contains("delete-unused"))
        .stdout(predicate::str::contains("use"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("stemward").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stemward"));
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("stemward").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("--config")
        .arg(temp_dir.path().join("nope.yml"))
        .arg("current")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Loading config"));
}

#[cfg(unix)]
#[test]
fn test_upload_is_idempotent() {
    let project = TestProject::new();
    let stemcell = project.write_stemcell("ubuntu", "1.0");

    project
        .stemward()
        .arg("upload")
        .arg(&stemcell)
        .assert()
        .success()
        .stdout(predicate::str::contains("CID: cid-1"));

    project
        .stemward()
        .arg("upload")
        .arg(&stemcell)
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: Stemcell already uploaded"))
        .stdout(predicate::str::contains("CID: cid-1"));

    assert_eq!(count(&project.requests(), "create_stemcell"), 1);
    assert!(project.requests().contains("/ubuntu-1.0/image"));

    let state = fs::read_to_string(project.state_file()).unwrap();
    assert_eq!(count(&state, "\"cid\": \"cid-1\""), 1);
}

#[cfg(unix)]
#[test]
fn test_delete_unused_keeps_current() {
    let project = TestProject::new();
    let old = project.write_stemcell("ubuntu", "1.0");
    let new = project.write_stemcell("ubuntu", "2.0");

    project.stemward().arg("upload").arg(&old).assert().success();
    project.stemward().arg("upload").arg(&new).assert().success();

    project
        .stemward()
        .arg("current")
        .assert()
        .success()
        .stdout(predicate::str::contains("No current stemcell"));

    project
        .stemward()
        .args(["use", "ubuntu", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cid-2"));

    project
        .stemward()
        .arg("unused")
        .assert()
        .success()
        .stdout(predicate::str::contains("cid-1"))
        .stdout(predicate::str::contains("cid-2").not());

    project
        .stemward()
        .arg("delete-unused")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleting unused stemcell 'cid-1'"));

    assert!(project.requests().contains(r#""arguments":["cid-1"]"#));
    assert_eq!(count(&project.requests(), "delete_stemcell"), 1);

    project
        .stemward()
        .arg("unused")
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused stemcells"));

    project
        .stemward()
        .arg("current")
        .assert()
        .success()
        .stdout(predicate::str::contains("cid-2"));
}

#[cfg(unix)]
#[test]
fn test_use_unknown_stemcell_fails() {
    let project = TestProject::new();

    project
        .stemward()
        .args(["use", "ubuntu", "9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been uploaded"));
}
