//! Index (staging area)
//!
//! The index tracks which files go into the next commit. It is persisted as a
//! JSON array of `{mode, oid, path}` records and held in memory keyed by path,
//! so every path appears at most once.
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to the tracked files below them, so that
//!   adding a file where a directory used to be (or the reverse) can discard
//!   the entries it replaces

use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index.json`)
    path: Box<Path>,
    entries: BTreeMap<Box<Path>, IndexEntry>,
    children: BTreeMap<Box<Path>, BTreeSet<Box<Path>>>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file yields an empty index.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let raw = std::fs::read(&self.path)
            .context(format!("Unable to read index file {}", self.path.display()))?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let entries: Vec<IndexEntry> = serde_json::from_slice(&raw)
            .context(format!("Unable to parse index file {}", self.path.display()))?;
        for entry in entries {
            self.store_entry(entry);
        }

        tracing::debug!(entries = self.entries.len(), "loaded index");
        Ok(())
    }

    /// Remove entries that would clash with `entry` when folded into a tree
    ///
    /// A file staged at one of the new entry's parent directories, or files
    /// staged below the new entry's own path, cannot coexist with it.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.path);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        let key = entry.path.clone().into_boxed_path();

        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_owned().into_boxed_path())
                .or_default()
                .insert(key.clone());
        }

        self.entries.insert(key, entry);
    }

    fn remove_children(&mut self, path: &Path) -> bool {
        match self.children.remove(path) {
            Some(children) => {
                for child in children {
                    self.remove_entry(&child);
                }
                true
            }
            None => false,
        }
    }

    fn remove_entry(&mut self, path: &Path) -> bool {
        match self.entries.remove(path) {
            None => false,
            Some(entry) => {
                for parent in entry.parent_dirs() {
                    if let Some(children) = self.children.get_mut(parent) {
                        children.remove(path);
                        if children.is_empty() {
                            self.children.remove(parent);
                        }
                    }
                }
                true
            }
        }
    }

    /// Stage an entry, replacing whatever was recorded for its path
    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.store_entry(entry);
    }

    pub fn upsert(&mut self, path: PathBuf, mode: FileMode, oid: ObjectId) {
        self.add(IndexEntry::new(mode, oid, path));
    }

    /// Unstage a path; returns whether anything was removed
    pub fn remove(&mut self, path: &Path) -> bool {
        self.remove_entry(path) | self.remove_children(path)
    }

    /// Swap the whole entry set, as reset and checkout do
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.clear();
        for entry in entries {
            self.store_entry(entry);
        }
    }

    /// Persist the full entry set, overwriting the index file
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let entries = self.entries.values().collect::<Vec<_>>();
        let json = serde_json::to_vec_pretty(&entries).context("Unable to encode index")?;

        std::fs::write(&self.path, json)
            .context(format!("Unable to write index file {}", self.path.display()))?;

        tracing::info!(entries = entries.len(), "wrote index");
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = IndexEntry> {
        self.entries.into_values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked paths equal to or below `path`; `.` selects everything
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| path == Path::new(".") || entry_path.starts_with(path))
            .map(|entry_path| entry_path.to_path_buf())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_object;
    use crate::artifacts::objects::object_type::ObjectType;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn index(dir: &TempDir) -> Index {
        Index::new(dir.path().join("index.json").into_boxed_path())
    }

    fn oid(content: &str) -> ObjectId {
        hash_object(ObjectType::Blob, content.as_bytes()).unwrap()
    }

    fn paths(index: &Index) -> Vec<&str> {
        index.paths().map(|path| path.to_str().unwrap()).collect()
    }

    #[rstest]
    fn missing_index_file_loads_empty(index_dir: TempDir) {
        let mut index = index(&index_dir);

        index.rehydrate().unwrap();

        assert!(index.is_empty());
    }

    #[rstest]
    fn re_adding_a_path_replaces_its_entry(index_dir: TempDir) {
        let mut index = index(&index_dir);

        index.upsert(PathBuf::from("a.txt"), FileMode::RegularFile, oid("v1"));
        index.upsert(PathBuf::from("a.txt"), FileMode::RegularFile, oid("v2"));
        index.upsert(PathBuf::from("a.txt"), FileMode::RegularFile, oid("v2"));

        assert_eq!(index.len(), 1);
        assert_eq!(index.entry_by_path(Path::new("a.txt")).unwrap().oid, oid("v2"));
    }

    #[rstest]
    fn file_replaces_staged_directory(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.upsert(PathBuf::from("alice.txt"), FileMode::RegularFile, oid("a"));
        index.upsert(PathBuf::from("nested/bob.txt"), FileMode::RegularFile, oid("b"));
        index.upsert(PathBuf::from("nested/inner/claire.txt"), FileMode::RegularFile, oid("c"));

        index.upsert(PathBuf::from("nested"), FileMode::RegularFile, oid("n"));

        assert_eq!(paths(&index), vec!["alice.txt", "nested"]);
    }

    #[rstest]
    fn directory_replaces_staged_file(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.upsert(PathBuf::from("alice.txt"), FileMode::RegularFile, oid("a"));
        index.upsert(PathBuf::from("bob.txt"), FileMode::RegularFile, oid("b"));

        index.upsert(PathBuf::from("alice.txt/nested.txt"), FileMode::RegularFile, oid("n"));

        assert_eq!(paths(&index), vec!["alice.txt/nested.txt", "bob.txt"]);
    }

    #[rstest]
    fn removal_reports_whether_anything_changed(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.upsert(PathBuf::from("dir/a.txt"), FileMode::RegularFile, oid("a"));

        assert!(!index.remove(Path::new("missing.txt")));
        assert!(index.remove(Path::new("dir/a.txt")));
        assert!(index.is_empty());
        assert!(index.entries_under_path(Path::new("dir")).is_empty());
    }

    #[rstest]
    fn entries_survive_a_save_and_reload(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.upsert(PathBuf::from("bin/run.sh"), FileMode::Executable, oid("run"));
        index.upsert(PathBuf::from("README"), FileMode::RegularFile, oid("readme"));
        index.write_updates().unwrap();

        let mut reloaded = self::index(&index_dir);
        reloaded.rehydrate().unwrap();

        assert_eq!(
            reloaded.entries().cloned().collect::<Vec<_>>(),
            index.entries().cloned().collect::<Vec<_>>()
        );
    }

    #[rstest]
    fn replace_all_drops_previous_entries(index_dir: TempDir) {
        let mut index = index(&index_dir);
        index.upsert(PathBuf::from("old.txt"), FileMode::RegularFile, oid("old"));

        index.replace_all([IndexEntry::new(FileMode::RegularFile, oid("new"), PathBuf::from("new.txt"))]);

        assert_eq!(paths(&index), vec!["new.txt"]);
    }
}
