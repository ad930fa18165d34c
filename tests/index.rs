use crate::common::command::{
    init_repository_dir, pit_commit, pit_output, repository_dir, run_pit_command,
};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[derive(Debug, serde::Deserialize)]
struct IndexRecord {
    mode: String,
    oid: String,
    path: String,
}

fn read_index(dir: &std::path::Path) -> Vec<IndexRecord> {
    let content = std::fs::read_to_string(dir.join(".git").join("index.json"))
        .expect("Failed to read index.json");
    serde_json::from_str(&content).expect("index.json is not a JSON array of entries")
}

#[rstest]
fn add_files_from_nested_directories(init_repository_dir: TempDir) {
    assert_eq!(
        pit_output(init_repository_dir.path(), &["ls-files"]),
        "1.txt\na/2.txt\na/b/3.txt"
    );
}

#[rstest]
fn index_is_stored_as_sorted_json_records(init_repository_dir: TempDir) {
    let records = read_index(init_repository_dir.path());

    assert_eq!(
        records
            .iter()
            .map(|record| record.path.as_str())
            .collect::<Vec<_>>(),
        vec!["1.txt", "a/2.txt", "a/b/3.txt"]
    );
    assert!(records.iter().all(|record| record.mode == "100644"));
    assert_eq!(records[0].oid, "43dd47ea691c90a5fa7827892c70241913351963");
}

#[rstest]
fn add_many_files_incrementally(repository_dir: TempDir) {
    run_pit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let mut files = write_generated_files(repository_dir.path(), 5);

    for file in &files {
        let name = file.path.file_name().and_then(|name| name.to_str()).unwrap();
        run_pit_command(repository_dir.path(), &["add", name])
            .assert()
            .success();
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    let expected = files
        .iter()
        .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(pit_output(repository_dir.path(), &["ls-files"]), expected);
}

#[rstest]
fn re_adding_a_file_replaces_its_entry(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));

    run_pit_command(dir, &["add", "1.txt"]).assert().success();

    let records = read_index(dir);
    assert_eq!(records.len(), 3);
    assert_ne!(records[0].oid, "43dd47ea691c90a5fa7827892c70241913351963");
}

#[rstest]
fn adding_a_missing_path_fails(init_repository_dir: TempDir) {
    run_pit_command(init_repository_dir.path(), &["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "pathspec 'missing.txt' did not match any files",
        ));
}

#[rstest]
fn adding_a_deleted_directory_unstages_its_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    std::fs::remove_dir_all(dir.join("a")).expect("Failed to delete directory");

    run_pit_command(dir, &["add", "a"]).assert().success();

    assert_eq!(pit_output(dir, &["ls-files"]), "1.txt");
}

#[rstest]
fn ignored_files_are_skipped_unless_named(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join(".gitignore"), "*.log\n".to_string()));
    write_file(FileSpec::new(dir.join("debug.log"), "noise".to_string()));

    run_pit_command(dir, &["add", "."]).assert().success();
    assert_eq!(
        pit_output(dir, &["ls-files"]),
        ".gitignore\n1.txt\na/2.txt\na/b/3.txt"
    );

    run_pit_command(dir, &["add", "debug.log"]).assert().success();
    assert!(pit_output(dir, &["ls-files"]).contains("debug.log"));
}

#[rstest]
fn rm_removes_file_and_entry(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_pit_command(dir, &["rm", "1.txt"])
        .assert()
        .success()
        .stdout(
            "File '1.txt' removed from working directory.\n\
             File '1.txt' removed from staging area.\n",
        );

    assert!(!dir.join("1.txt").exists());
    assert_eq!(pit_output(dir, &["ls-files"]), "a/2.txt\na/b/3.txt");

    run_pit_command(dir, &["rm", "1.txt"])
        .assert()
        .success()
        .stdout(
            "File '1.txt' does not exist in working directory.\n\
             File '1.txt' was not in the index.\n",
        );
}

#[rstest]
fn first_commit_is_a_root_commit(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_pit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    run_pit_command(dir, &["add", "1.txt"]).assert().success();

    pit_commit(dir, "First commit\n\nwith a body")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master \(root-commit\) [0-9a-f]{7}\] First commit\n$").unwrap());

    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    run_pit_command(dir, &["add", "1.txt"]).assert().success();
    pit_commit(dir, "Second commit")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Second commit\n$").unwrap());
}

#[rstest]
fn commit_of_an_empty_index_fails(repository_dir: TempDir) {
    run_pit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    pit_commit(repository_dir.path(), "nothing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("the index is empty"));
    assert!(!repository_dir.path().join(".git/refs/heads/master").exists());
}

#[rstest]
fn commit_without_identity_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_pit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    run_pit_command(dir, &["add", "1.txt"]).assert().success();

    run_pit_command(dir, &["commit", "-m", "anonymous"])
        .env_remove("GIT_AUTHOR_NAME")
        .env_remove("GIT_AUTHOR_EMAIL")
        .env_remove("GIT_COMMITTER_NAME")
        .env_remove("GIT_COMMITTER_EMAIL")
        .env("HOME", dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("user.name is not configured"));
}

#[rstest]
fn commit_reads_identity_from_repository_config(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_pit_command(dir, &["init"]).assert().success();
    let config = dir.join(".git").join("config");
    let mut content = std::fs::read_to_string(&config).expect("Failed to read config");
    content.push_str("[user]\n\tname = Config User\n\temail = \"config@example.com\"\n");
    std::fs::write(&config, content).expect("Failed to write config");
    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    run_pit_command(dir, &["add", "1.txt"]).assert().success();

    run_pit_command(dir, &["commit", "-m", "configured"])
        .env_remove("GIT_AUTHOR_NAME")
        .env_remove("GIT_AUTHOR_EMAIL")
        .env_remove("GIT_COMMITTER_NAME")
        .env_remove("GIT_COMMITTER_EMAIL")
        .env("HOME", dir)
        .assert()
        .success();

    assert!(
        pit_output(dir, &["cat-file", "-p", "HEAD"])
            .contains("author Config User <config@example.com>")
    );
}
