use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use colored::Colorize;

impl Repository {
    /// Create a branch at `start_point` (default HEAD) without switching to it
    pub fn branch(&self, name: &str, start_point: Option<&str>) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;
        let (source_oid, _) = self.resolve_commit(start_point.unwrap_or(HEAD_REF_NAME))?;

        self.refs().create_branch(&branch, &source_oid)?;

        Ok(())
    }

    /// List branches, marking the checked out one
    pub fn list_branches(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let current = self.refs().current_branch()?;

        for branch in self.refs().list_branches()? {
            if current.as_deref() == Some(branch.as_str()) {
                writeln!(self.writer(), "* {}", branch.green())?;
            } else {
                writeln!(self.writer(), "  {}", branch)?;
            }
        }

        Ok(())
    }
}
