use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_pit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_pit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    pit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// Repository where `file.txt` holds `v1` in the first commit and `v2` in the second
#[fixture]
pub fn two_version_repository_dir(repository_dir: TempDir) -> TempDir {
    run_pit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for version in ["v1", "v2"] {
        write_file(FileSpec::new(
            repository_dir.path().join("file.txt"),
            version.to_string(),
        ));
        run_pit_command(repository_dir.path(), &["add", "file.txt"])
            .assert()
            .success();
        pit_commit(repository_dir.path(), version)
            .assert()
            .success();
    }

    repository_dir
}

pub fn run_pit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("pit").expect("Failed to find pit binary");
    cmd.current_dir(dir);
    cmd.env_remove("PIT_LOG");
    cmd.env("NO_COLOR", "1");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn pit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_pit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", AUTHOR_NAME),
        ("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

/// Run a command that must succeed and return its trimmed stdout
pub fn pit_output(dir: &Path, args: &[&str]) -> String {
    let output = run_pit_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stdout.clone())
        .expect("pit printed invalid UTF-8")
        .trim_end()
        .to_string()
}

pub fn rev_parse(dir: &Path, revision: &str) -> String {
    pit_output(dir, &["rev-parse", revision])
}

/// Read HEAD by hand, following one level of symbolic ref
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".git").join("HEAD"))?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let commit_sha = std::fs::read_to_string(dir.join(".git").join(ref_path.trim()))?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}
