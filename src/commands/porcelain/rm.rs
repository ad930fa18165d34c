use crate::areas::repository::Repository;
use std::path::Path;

/// Where `rm` found something to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Removal {
    pub from_workspace: bool,
    pub from_index: bool,
}

impl Repository {
    /// Delete a file from the working directory and drop its index entry
    ///
    /// Each side is handled independently; a missing file or entry is not an
    /// error.
    pub fn remove_path(&self, path: &Path) -> anyhow::Result<Removal> {
        let relative = self.workspace().relativize(path)?;
        let mut index = self.load_index()?;

        let from_workspace =
            self.workspace().exists(&relative) && !self.workspace().is_dir(&relative);
        if from_workspace {
            self.workspace().remove_file(&relative)?;
        }

        let from_index = index.remove(&relative);
        if from_index {
            index.write_updates()?;
        }

        tracing::info!(path = %relative.display(), from_workspace, from_index, "removed path");
        Ok(Removal {
            from_workspace,
            from_index,
        })
    }

    pub fn rm(&self, path: &str) -> anyhow::Result<()> {
        let removal = self.remove_path(Path::new(path))?;

        if removal.from_workspace {
            writeln!(self.writer(), "File '{}' removed from working directory.", path)?;
        } else {
            writeln!(self.writer(), "File '{}' does not exist in working directory.", path)?;
        }

        if removal.from_index {
            writeln!(self.writer(), "File '{}' removed from staging area.", path)?;
        } else {
            writeln!(self.writer(), "File '{}' was not in the index.", path)?;
        }

        Ok(())
    }
}
