use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

impl Repository {
    /// First-parent history starting at HEAD, newest first
    pub fn history(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        self.ensure_initialized()?;

        let mut commits = Vec::new();
        let mut current = self.refs().read_head()?;

        while let Some(commit_oid) = current {
            let commit = self.database().parse_object_as_commit(&commit_oid)?;
            current = commit.parent().cloned();
            commits.push((commit_oid, commit));
        }

        Ok(commits)
    }

    pub fn log(&self) -> anyhow::Result<()> {
        for (index, (commit_oid, commit)) in self.history()?.iter().enumerate() {
            if index > 0 {
                writeln!(self.writer())?;
            }
            self.show_commit_medium(commit_oid, commit)?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let header = format!("commit {}", commit_oid);

        writeln!(self.writer(), "{}", header.yellow())?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }
}
