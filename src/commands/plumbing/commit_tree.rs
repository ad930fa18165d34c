use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Store a commit of `tree_oid` with the resolved identity
    ///
    /// The tree must exist and the optional parent must be a commit. No ref
    /// is moved.
    pub fn build_commit(
        &self,
        tree_oid: &ObjectId,
        message: &str,
        parent_oid: Option<&ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        self.database().parse_object_as_tree(tree_oid)?;
        if let Some(parent_oid) = parent_oid {
            self.database().parse_object_as_commit(parent_oid)?;
        }

        let (author, committer) = self.identity().resolve(&self.config_path())?;
        let commit = Commit::new(
            parent_oid.cloned(),
            tree_oid.clone(),
            author,
            committer,
            message.to_string(),
        );

        self.database().store(&commit)
    }

    pub fn commit_tree(
        &self,
        tree: &str,
        message: &str,
        parent: Option<&str>,
    ) -> anyhow::Result<()> {
        let tree_oid = self.resolve_revision(tree)?;
        let parent_oid = parent
            .map(|parent| self.resolve_revision(parent))
            .transpose()?;

        let commit_id = self.build_commit(&tree_oid, message, parent_oid.as_ref())?;
        writeln!(self.writer(), "{}", commit_id)?;

        Ok(())
    }
}
