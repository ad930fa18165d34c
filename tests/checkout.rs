use crate::common::command::{
    get_head_commit_sha, init_repository_dir, pit_commit, pit_output, rev_parse,
    run_pit_command, two_version_repository_dir,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn read_head(dir: &std::path::Path) -> String {
    std::fs::read_to_string(dir.join(".git").join("HEAD")).expect("Failed to read HEAD")
}

#[rstest]
fn checkout_new_branch_points_head_at_it(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let head = rev_parse(dir, "HEAD");

    run_pit_command(dir, &["checkout", "-b", "feature"])
        .assert()
        .success()
        .stdout("Switched to a new branch 'feature'\n");

    assert_eq!(read_head(dir), "ref: refs/heads/feature\n");
    assert_eq!(rev_parse(dir, "feature"), head);
    assert_eq!(read_file(&dir.join("file.txt")), "v2");
}

#[rstest]
fn checkout_new_branch_from_a_start_point_rewrites_files(
    two_version_repository_dir: TempDir,
) {
    let dir = two_version_repository_dir.path();
    let first = rev_parse(dir, "HEAD~1");

    run_pit_command(dir, &["checkout", "-b", "old", "HEAD~1"])
        .assert()
        .success();

    assert_eq!(get_head_commit_sha(dir).expect("HEAD is readable"), first);
    assert_eq!(read_file(&dir.join("file.txt")), "v1");
    assert_eq!(pit_output(dir, &["status", "--short"]), "");
}

#[rstest]
fn checkout_new_branch_with_an_existing_name_fails(two_version_repository_dir: TempDir) {
    run_pit_command(two_version_repository_dir.path(), &["checkout", "-b", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a branch named 'master' already exists"));
}

#[rstest]
fn checkout_existing_branch_keeps_head_symbolic(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    run_pit_command(dir, &["branch", "old", "HEAD~1"])
        .assert()
        .success();

    run_pit_command(dir, &["checkout", "old"])
        .assert()
        .success()
        .stdout("Switched to branch 'old'\n");

    assert_eq!(read_head(dir), "ref: refs/heads/old\n");
    assert_eq!(read_file(&dir.join("file.txt")), "v1");

    run_pit_command(dir, &["checkout", "master"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("file.txt")), "v2");
}

#[rstest]
fn checkout_prefers_a_branch_named_like_an_abbreviated_oid(
    two_version_repository_dir: TempDir,
) {
    let dir = two_version_repository_dir.path();
    let tip = rev_parse(dir, "HEAD");
    let first = rev_parse(dir, "HEAD~1");
    let branch = &first[..8];
    run_pit_command(dir, &["branch", branch]).assert().success();

    run_pit_command(dir, &["checkout", branch])
        .assert()
        .success()
        .stdout(format!("Switched to branch '{}'\n", branch));

    assert_eq!(read_head(dir), format!("ref: refs/heads/{}\n", branch));
    assert_eq!(rev_parse(dir, "HEAD"), tip);
    assert_eq!(read_file(&dir.join("file.txt")), "v2");
    assert_eq!(pit_output(dir, &["status", "--short"]), "");
}

#[rstest]
fn checkout_hex_looking_branch_without_matching_objects(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    run_pit_command(dir, &["branch", "beef", "HEAD~1"])
        .assert()
        .success();

    run_pit_command(dir, &["checkout", "beef"])
        .assert()
        .success()
        .stdout("Switched to branch 'beef'\n");

    assert_eq!(read_head(dir), "ref: refs/heads/beef\n");
    assert_eq!(read_file(&dir.join("file.txt")), "v1");
}

#[rstest]
fn checkout_commit_detaches_head(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let first = rev_parse(dir, "HEAD~1");

    run_pit_command(dir, &["checkout", &first[..10]])
        .assert()
        .success()
        .stdout(format!("HEAD is now at {} v1\n", &first[..7]));

    assert_eq!(read_head(dir), format!("{}\n", first));
    assert_eq!(read_file(&dir.join("file.txt")), "v1");
    run_pit_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("HEAD detached at {}", &first[..7])));
}

#[rstest]
fn commit_on_detached_head_moves_only_head(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let master = rev_parse(dir, "master");
    let first = rev_parse(dir, "HEAD~1");
    run_pit_command(dir, &["checkout", &first]).assert().success();

    write_file(FileSpec::new(dir.join("file.txt"), "v1.1".to_string()));
    run_pit_command(dir, &["add", "file.txt"]).assert().success();
    pit_commit(dir, "patch")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[HEAD detached at "));

    assert_eq!(rev_parse(dir, "master"), master);
    assert_eq!(rev_parse(dir, "HEAD~1"), first);
}

#[rstest]
fn checkout_with_local_changes_is_refused(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    let head_before = read_head(dir);
    let index_path = dir.join(".git").join("index.json");
    let index_before = std::fs::read(&index_path).expect("Failed to read index");
    write_file(FileSpec::new(dir.join("file.txt"), "local edit".to_string()));

    run_pit_command(dir, &["checkout", "HEAD~1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Your local changes to the following files would be overwritten by checkout:",
        ))
        .stderr(predicate::str::contains("\tfile.txt"));

    assert_eq!(read_head(dir), head_before);
    assert_eq!(
        std::fs::read(&index_path).expect("Failed to read index"),
        index_before
    );
    assert_eq!(read_file(&dir.join("file.txt")), "local edit");
}

#[rstest]
fn checkout_with_a_deleted_file_is_refused(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    std::fs::remove_file(dir.join("a/2.txt")).expect("Failed to delete file");

    run_pit_command(dir, &["checkout", "HEAD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a/2.txt"));
    assert!(!dir.join("a/2.txt").exists());
}

#[rstest]
fn checkout_ignores_untracked_files(two_version_repository_dir: TempDir) {
    let dir = two_version_repository_dir.path();
    write_file(FileSpec::new(dir.join("notes.txt"), "mine".to_string()));

    run_pit_command(dir, &["checkout", "HEAD~1"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("notes.txt")), "mine");
}

#[rstest]
fn checkout_unknown_target_fails(two_version_repository_dir: TempDir) {
    run_pit_command(two_version_repository_dir.path(), &["checkout", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown revision 'nowhere'"));
}
