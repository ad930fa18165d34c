use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

/// What a new commit landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub oid: ObjectId,
    /// Branch name, or `HEAD detached at <short-oid>`
    pub head: String,
    pub is_root: bool,
}

impl Repository {
    /// Commit the index on top of HEAD and move HEAD's branch to it
    pub fn commit_index(&self, message: &str) -> anyhow::Result<CommitSummary> {
        let tree_oid = self.store_index_tree()?;
        let parent = self.refs().read_head()?;

        let oid = self.build_commit(&tree_oid, message, parent.as_ref())?;
        self.refs().update_head(&oid)?;

        let head = match self.refs().current_branch()? {
            Some(branch) => branch,
            None => format!("HEAD detached at {}", oid.to_short_oid()),
        };

        Ok(CommitSummary {
            oid,
            head,
            is_root: parent.is_none(),
        })
    }

    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let summary = self.commit_index(message)?;
        let root = if summary.is_root { " (root-commit)" } else { "" };

        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            summary.head,
            root,
            summary.oid.to_short_oid(),
            message.lines().next().unwrap_or_default()
        )?;

        Ok(())
    }
}
