use crate::common::command::{
    pit_commit, pit_output, rev_parse, run_pit_command, two_version_repository_dir,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn soft_reset_only_moves_the_branch(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let first = rev_parse(dir, "HEAD~1");

    run_pit_command(dir, &["reset", "--soft", "HEAD~1"])
        .assert()
        .success()
        .stdout(format!("HEAD is now at {}  (soft)\n", &first[..7]));

    assert_eq!(rev_parse(dir, "master"), first);
    assert_eq!(read_file(&dir.join("file.txt")), "v2");
    assert_eq!(pit_output(dir, &["status", "--short"]), "M  file.txt");
}

#[rstest]
fn mixed_reset_is_the_default_and_reloads_the_index(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let first = rev_parse(dir, "HEAD~1");

    run_pit_command(dir, &["reset", &first])
        .assert()
        .success()
        .stdout(format!("HEAD is now at {}  (mixed)\n", &first[..7]));

    assert_eq!(rev_parse(dir, "HEAD"), first);
    assert_eq!(read_file(&dir.join("file.txt")), "v2");
    assert_eq!(pit_output(dir, &["status", "--short"]), " M file.txt");
}

#[rstest]
fn hard_reset_rewrites_the_working_directory(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let first = rev_parse(dir, "HEAD~1");

    run_pit_command(dir, &["reset", "--hard", "HEAD^"])
        .assert()
        .success()
        .stdout(format!("HEAD is now at {}  (hard)\n", &first[..7]));

    assert_eq!(rev_parse(dir, "HEAD"), first);
    assert_eq!(read_file(&dir.join("file.txt")), "v1");
    assert_eq!(pit_output(dir, &["status", "--short"]), "");
}

#[rstest]
fn hard_reset_removes_tracked_files_but_keeps_untracked_ones(
    two_version_repository_dir: TempDir,
) {
    let dir = two_version_repository_dir.path();
    write_file(FileSpec::new(dir.join("extra/new.txt"), "new".to_string()));
    run_pit_command(dir, &["add", "extra"]).assert().success();
    pit_commit(dir, "v3").assert().success();
    write_file(FileSpec::new(dir.join("notes.txt"), "mine".to_string()));

    run_pit_command(dir, &["reset", "--hard", "HEAD~1"])
        .assert()
        .success();

    assert!(!dir.join("extra").exists());
    assert_eq!(read_file(&dir.join("notes.txt")), "mine");
    assert_eq!(pit_output(dir, &["ls-files"]), "file.txt");
}

#[rstest]
fn hard_reset_to_head_discards_local_edits(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    write_file(FileSpec::new(dir.join("file.txt"), "scribbles".to_string()));

    run_pit_command(dir, &["reset", "--hard"]).assert().success();

    assert_eq!(read_file(&dir.join("file.txt")), "v2");
}

#[rstest]
fn reset_to_an_unknown_revision_changes_nothing(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let head = rev_parse(dir, "HEAD");

    run_pit_command(dir, &["reset", "--hard", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown revision 'nowhere'"));

    assert_eq!(rev_parse(dir, "HEAD"), head);
    assert_eq!(read_file(&dir.join("file.txt")), "v2");
}

#[rstest]
fn reset_past_the_root_commit_fails(two_version_repository_dir: TempDir) {
    run_pit_command(two_version_repository_dir.path(), &["reset", "HEAD~2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown revision"));
}
