use crate::areas::database::FlatTree;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::hash_object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::ignore_rules::IgnorePredicate;
use derive_new::new;
use std::path::Path;

/// Compares single paths across the HEAD tree, the index and the workspace
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// A workspace file nobody tracks and no ignore rule covers
    pub fn is_untracked(
        &self,
        path: &Path,
        index: &Index,
        head_tree: &FlatTree,
        ignore_rules: &dyn IgnorePredicate,
    ) -> bool {
        index.entry_by_path(path).is_none()
            && !head_tree.contains_key(path)
            && !ignore_rules.is_ignored(path, false)
    }

    fn is_content_changed(&self, path: &Path, expected: &ObjectId) -> anyhow::Result<bool> {
        let content = self.repository.workspace().read_file(path)?;
        let oid = hash_object(ObjectType::Blob, &content)?;

        Ok(&oid != expected)
    }

    fn check_path_against_workspace(
        &self,
        path: &Path,
        expected: &ObjectId,
    ) -> anyhow::Result<WorkspaceChangeType> {
        let workspace = self.repository.workspace();

        if !workspace.exists(path) || workspace.is_dir(path) {
            Ok(WorkspaceChangeType::Deleted)
        } else if self.is_content_changed(path, expected)? {
            Ok(WorkspaceChangeType::Modified)
        } else {
            Ok(WorkspaceChangeType::None)
        }
    }

    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
    ) -> anyhow::Result<WorkspaceChangeType> {
        self.check_path_against_workspace(&entry.path, &entry.oid)
    }

    /// Used by checkout to make sure committed files were left alone
    pub fn check_head_entry_against_workspace(
        &self,
        path: &Path,
        head_entry: &DatabaseEntry,
    ) -> anyhow::Result<WorkspaceChangeType> {
        self.check_path_against_workspace(path, &head_entry.oid)
    }

    pub fn check_index_against_head_tree(
        &self,
        index_entry: Option<&IndexEntry>,
        head_entry: Option<&DatabaseEntry>,
    ) -> IndexChangeType {
        match (index_entry, head_entry) {
            (Some(index_entry), Some(head_entry)) if head_entry.oid != index_entry.oid => {
                IndexChangeType::Modified
            }
            (Some(_), None) => IndexChangeType::Added,
            (None, Some(_)) => IndexChangeType::Deleted,
            _ => IndexChangeType::None,
        }
    }
}
