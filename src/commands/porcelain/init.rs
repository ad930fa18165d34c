use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;

const REPOSITORY_DIRS: [&str; 6] = [
    "objects/info",
    "objects/pack",
    "refs/heads",
    "refs/tags",
    "hooks",
    "info",
];

const DEFAULT_CONFIG: &str = "[core]\n\
    \trepositoryformatversion = 0\n\
    \tfilemode = true\n\
    \tbare = false\n\
    \tlogallrefupdates = true\n";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed pit repository; edit this file 'description' to name the repository.\n";

impl Repository {
    /// Create the `.git` skeleton; returns `false` if one already existed
    pub fn init_repository(&self) -> anyhow::Result<bool> {
        let git_path = self.git_path();
        if git_path.is_dir() {
            return Ok(false);
        }

        for dir in REPOSITORY_DIRS {
            fs::create_dir_all(git_path.join(dir))
                .with_context(|| format!("Failed to create .git/{} directory", dir))?;
        }

        self.refs()
            .set_head_symbolic(&BranchName::try_parse(DEFAULT_BRANCH.to_string())?)
            .context("Failed to create initial HEAD reference")?;
        fs::write(self.config_path(), DEFAULT_CONFIG).context("Failed to write .git/config")?;
        fs::write(git_path.join("description"), DEFAULT_DESCRIPTION)
            .context("Failed to write .git/description")?;

        tracing::info!(path = %git_path.display(), "initialized repository");
        Ok(true)
    }

    pub fn init(&self) -> anyhow::Result<()> {
        let message = if self.init_repository()? {
            "Initialized empty Pit repository in"
        } else {
            "Reinitialized existing Pit repository in"
        };

        writeln!(self.writer(), "{} {}/", message, self.git_path().display())?;

        Ok(())
    }
}
