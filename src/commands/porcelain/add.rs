use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::ignore_rules::IgnorePredicate;
use crate::errors::PitError;
use std::path::PathBuf;

impl Repository {
    /// Stage files, expanding directories into the files below them
    ///
    /// Ignored files are skipped unless named explicitly. Tracked files that
    /// no longer exist under a given path are unstaged. Returns the paths
    /// whose entries were written.
    pub fn stage_paths(&self, paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
        let mut index = self.load_index()?;
        let ignore_rules = self.ignore_rules()?;
        let mut staged = Vec::new();

        for path in paths {
            let relative = self.workspace().relativize(path)?;

            if !self.workspace().exists(&relative) {
                let tracked = index.entries_under_path(&relative);
                if tracked.is_empty() {
                    return Err(PitError::PathNotFound(path.clone()).into());
                }
                for tracked_path in tracked {
                    index.remove(&tracked_path);
                }
                continue;
            }

            let files = self
                .workspace()
                .list_files(Some(&relative))?
                .into_iter()
                .filter(|file| file == &relative || !ignore_rules.is_ignored(file, false))
                .collect::<Vec<_>>();

            for file in &files {
                let content = self.workspace().read_file(file)?;
                let mode = self.workspace().file_mode(file)?;
                let oid = self.database().write_object(ObjectType::Blob, &content)?;

                index.upsert(file.clone(), mode, oid);
                staged.push(file.clone());
            }

            for tracked_path in index.entries_under_path(&relative) {
                if !self.workspace().exists(&tracked_path) {
                    index.remove(&tracked_path);
                }
            }
        }

        index.write_updates()?;

        Ok(staged)
    }

    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let paths = paths.iter().map(PathBuf::from).collect::<Vec<_>>();
        let staged = self.stage_paths(&paths)?;

        tracing::debug!(files = staged.len(), "staged files");
        Ok(())
    }
}
