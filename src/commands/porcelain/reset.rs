use crate::areas::repository::Repository;
use crate::artifacts::checkout::ResetMode;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Move HEAD's branch to a commit and, depending on `mode`, reload the
    /// index and working directory from it
    pub fn reset_to(&self, revision: &str, mode: ResetMode) -> anyhow::Result<ObjectId> {
        let (commit_oid, _) = self.resolve_commit(revision)?;

        self.refs().update_head(&commit_oid)?;
        if mode.updates_index() {
            self.load_commit(&commit_oid, mode.updates_workspace())?;
        }

        tracing::info!(oid = %commit_oid, %mode, "reset");
        Ok(commit_oid)
    }

    /// Replace the index with a commit's tree, rewriting tracked files too
    /// when `update_workspace` is set
    pub(crate) fn load_commit(
        &self,
        commit_oid: &ObjectId,
        update_workspace: bool,
    ) -> anyhow::Result<()> {
        let target_tree = self.flatten_commit_tree(commit_oid)?;
        let mut index = self.load_index()?;

        Migration::new(self, &mut index, target_tree).apply_changes(update_workspace)?;
        index.write_updates()
    }

    pub fn reset(&self, revision: &str, mode: ResetMode) -> anyhow::Result<()> {
        let commit_oid = self.reset_to(revision, mode)?;

        writeln!(
            self.writer(),
            "HEAD is now at {}  ({})",
            commit_oid.to_short_oid(),
            mode
        )?;

        Ok(())
    }
}
