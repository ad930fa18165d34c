//! Workspace and index rewrite for reset and checkout
//!
//! A migration compares the current index with the flattened target tree and
//! plans one action per path:
//!
//! - tracked paths absent from the target are deleted
//! - target paths already tracked are modified (rewritten)
//! - target paths not yet tracked are added
//!
//! Untracked files are never touched. Once applied, the index holds exactly
//! the target tree's entries.

use crate::areas::database::FlatTree;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Add,
    Delete,
    Modify,
}

/// Planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, Vec<(PathBuf, Option<DatabaseEntry>)>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    index: &'r mut Index,
    target: FlatTree,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, index: &'r mut Index, target: FlatTree) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            repository,
            index,
            target,
            actions,
        }
    }

    pub fn actions_of(
        &self,
        action_type: ActionType,
    ) -> impl Iterator<Item = (&Path, Option<&DatabaseEntry>)> {
        self.actions
            .get(&action_type)
            .into_iter()
            .flatten()
            .map(|(path, entry)| (path.as_path(), entry.as_ref()))
    }

    /// Plan, then rewrite the working directory (when asked) and the index
    pub fn apply_changes(&mut self, update_workspace: bool) -> anyhow::Result<()> {
        self.plan_changes();

        if update_workspace {
            self.repository.workspace().apply_migration(self)?;
        }
        self.update_index();

        tracing::info!(
            added = self.actions[&ActionType::Add].len(),
            modified = self.actions[&ActionType::Modify].len(),
            deleted = self.actions[&ActionType::Delete].len(),
            workspace = update_workspace,
            "applied migration"
        );

        Ok(())
    }

    fn plan_changes(&mut self) {
        let deleted = self
            .index
            .paths()
            .filter(|path| !self.target.contains_key(*path))
            .map(|path| (path.to_path_buf(), None))
            .collect::<Vec<_>>();
        self.record(ActionType::Delete, deleted);

        let (modified, added): (Vec<_>, Vec<_>) = self
            .target
            .iter()
            .map(|(path, entry)| (path.clone(), Some(entry.clone())))
            .partition(|(path, _)| self.index.entry_by_path(path).is_some());
        self.record(ActionType::Modify, modified);
        self.record(ActionType::Add, added);
    }

    fn record(&mut self, action_type: ActionType, changes: Vec<(PathBuf, Option<DatabaseEntry>)>) {
        self.actions.entry(action_type).or_default().extend(changes);
    }

    fn update_index(&mut self) {
        let entries = self
            .target
            .iter()
            .map(|(path, entry)| IndexEntry::new(entry.mode, entry.oid.clone(), path.clone()));

        self.index.replace_all(entries);
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self
            .repository
            .database()
            .parse_object_as_blob(object_id)?;

        Ok(blob.into_content())
    }
}
