use crate::areas::database::FlatTree;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::ignore_rules::IgnorePredicate;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

/// Snapshot of how HEAD, the index and the workspace differ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    changed_files: BTreeMap<PathBuf, FileChange>,
    untracked_files: FileSet,
}

impl StatusReport {
    pub fn changed_files(&self) -> &BTreeMap<PathBuf, FileChange> {
        &self.changed_files
    }

    pub fn change_for(&self, path: impl Into<PathBuf>) -> Option<&FileChange> {
        self.changed_files.get(&path.into())
    }

    pub fn staged(&self) -> BTreeMap<PathBuf, IndexChangeType> {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(path, change)| (path.clone(), change.index_change))
            .collect()
    }

    pub fn unstaged(&self) -> BTreeMap<PathBuf, WorkspaceChangeType> {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(path, change)| (path.clone(), change.workspace_change))
            .collect()
    }

    pub fn untracked(&self) -> &FileSet {
        &self.untracked_files
    }

    pub fn index_changeset(&self) -> ChangeSet {
        self.staged()
            .into_iter()
            .map(|(path, change)| (path, FileChangeType::Index(change)))
            .collect()
    }

    pub fn workspace_changeset(&self) -> ChangeSet {
        self.unstaged()
            .into_iter()
            .map(|(path, change)| (path, FileChangeType::Workspace(change)))
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.untracked_files.is_empty()
    }
}

/// Builds a [`StatusReport`] without touching the repository
#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn report(
        &self,
        index: &Index,
        ignore_rules: &dyn IgnorePredicate,
    ) -> anyhow::Result<StatusReport> {
        let inspector = Inspector::new(self.repository);
        let head_tree = self.repository.head_tree()?;

        let mut changed_files = self.check_index_entries(&head_tree, index, &inspector)?;
        self.collect_deleted_head_files(&head_tree, index, &mut changed_files);
        let untracked_files = self.scan_workspace(&head_tree, index, &inspector, ignore_rules)?;

        tracing::debug!(
            changed = changed_files.len(),
            untracked = untracked_files.len(),
            "computed status"
        );

        Ok(StatusReport {
            changed_files,
            untracked_files,
        })
    }

    fn scan_workspace(
        &self,
        head_tree: &FlatTree,
        index: &Index,
        inspector: &Inspector<'_>,
        ignore_rules: &dyn IgnorePredicate,
    ) -> anyhow::Result<FileSet> {
        let files = self.repository.workspace().list_files(None)?;

        Ok(files
            .into_iter()
            .filter(|path| inspector.is_untracked(path, index, head_tree, ignore_rules))
            .collect())
    }

    fn check_index_entries(
        &self,
        head_tree: &FlatTree,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeMap<PathBuf, FileChange>> {
        let mut changed_files = BTreeMap::<PathBuf, FileChange>::new();

        for entry in index.entries() {
            let workspace_change = inspector.check_index_against_workspace(entry)?;
            let index_change =
                inspector.check_index_against_head_tree(Some(entry), head_tree.get(&entry.path));

            let change = FileChange {
                index_change,
                workspace_change,
            };
            if change != FileChange::default() {
                changed_files.insert(entry.path.clone(), change);
            }
        }

        Ok(changed_files)
    }

    fn collect_deleted_head_files(
        &self,
        head_tree: &FlatTree,
        index: &Index,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        head_tree
            .keys()
            .filter(|path| index.entry_by_path(path).is_none())
            .for_each(|path| {
                changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            });
    }
}
