use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::index::entry_mode::FileMode;
use crate::errors::PitError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".git"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Turn a user supplied path into a path relative to the workspace root
    ///
    /// Relative paths are taken relative to the workspace root.
    pub fn relativize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }

        normalized
            .strip_prefix(self.path.as_ref())
            .map(Path::to_path_buf)
            .map_err(|_| anyhow::anyhow!("'{}' is outside the repository", path.display()))
    }

    /// Every file below `root` (or the whole workspace), relative to the workspace
    ///
    /// Symlinks are listed as files and never followed. `.git` is skipped.
    pub fn list_files(&self, root: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let root = match root {
            Some(root) => self.path.join(root),
            None => self.path.to_path_buf(),
        };

        if std::fs::symlink_metadata(&root).is_err() {
            return Err(PitError::PathNotFound(
                root.strip_prefix(self.path.as_ref()).unwrap_or(&root).to_path_buf(),
            )
            .into());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()));

        for entry in walker {
            let entry = entry.with_context(|| format!("Unable to walk {}", root.display()))?;
            if entry.file_type().is_dir() {
                continue;
            }

            files.push(
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .context("walked outside the workspace")?
                    .to_path_buf(),
            );
        }

        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    /// Whether anything (file, directory or dangling symlink) exists at `path`
    pub fn exists(&self, file_path: &Path) -> bool {
        std::fs::symlink_metadata(self.path.join(file_path)).is_ok()
    }

    pub fn is_dir(&self, file_path: &Path) -> bool {
        std::fs::symlink_metadata(self.path.join(file_path))
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    /// Bytes a file would be stored as: file content, or the link target for symlinks
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let path = self.path.join(file_path);

        if FileMode::of_path(&path)? == FileMode::Symlink {
            let target = std::fs::read_link(&path)
                .with_context(|| format!("Unable to read link {}", file_path.display()))?;
            return Ok(Bytes::from(target.to_string_lossy().into_owned()));
        }

        let content = std::fs::read(&path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;
        Ok(Bytes::from(content))
    }

    pub fn file_mode(&self, file_path: &Path) -> anyhow::Result<FileMode> {
        FileMode::of_path(&self.path.join(file_path))
            .with_context(|| format!("Unable to stat {}", file_path.display()))
    }

    /// Delete a file and any parent directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        self.prune_empty_parents(file_path)
    }

    fn prune_empty_parents(&self, file_path: &Path) -> anyhow::Result<()> {
        for parent in file_path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }

            let dir = self.path.join(parent);
            match std::fs::read_dir(&dir).map(|mut entries| entries.next().is_none()) {
                Ok(true) => {
                    std::fs::remove_dir(&dir)
                        .with_context(|| format!("Failed to remove directory: {:?}", parent))?;
                }
                _ => break,
            }
        }

        Ok(())
    }

    /// Write `data` at `file_path` with the given mode, replacing whatever is there
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: FileMode) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if let Some(parent) = file_path.parent() {
            self.make_directory(parent)?;
        }

        if let Ok(metadata) = std::fs::symlink_metadata(&path) {
            if metadata.is_dir() {
                std::fs::remove_dir_all(&path).with_context(|| {
                    format!("Failed to remove existing directory: {:?}", file_path)
                })?;
            } else {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
            }
        }

        if mode == FileMode::Symlink {
            return self.write_symlink(file_path, data);
        }

        std::fs::write(&path, data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(match mode {
                FileMode::Executable => 0o755,
                _ => 0o644,
            });
            std::fs::set_permissions(&path, permissions)
                .with_context(|| format!("Failed to set permissions for file: {:?}", file_path))?;
        }

        Ok(())
    }

    #[cfg(unix)]
    fn write_symlink(&self, file_path: &Path, target: &[u8]) -> anyhow::Result<()> {
        use std::os::unix::ffi::OsStrExt;

        std::os::unix::fs::symlink(std::ffi::OsStr::from_bytes(target), self.path.join(file_path))
            .with_context(|| format!("Failed to create symlink: {:?}", file_path))
    }

    #[cfg(not(unix))]
    fn write_symlink(&self, file_path: &Path, target: &[u8]) -> anyhow::Result<()> {
        std::fs::write(self.path.join(file_path), target)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Create `dir_path` and its parents, replacing files that sit in the way
    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let mut current = PathBuf::new();

        for component in dir_path.components() {
            current.push(component);
            let path = self.path.join(&current);

            match std::fs::symlink_metadata(&path) {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(_) => std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove file: {:?}", current))?,
                Err(_) => {}
            }

            std::fs::create_dir(&path)
                .with_context(|| format!("Failed to create directory: {:?}", current))?;
        }

        Ok(())
    }

    /// Apply a planned checkout: deletions first, then writes
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions_of(ActionType::Delete) {
            if self.exists(file_path) && !self.is_dir(file_path) {
                self.remove_file(file_path)?;
            }
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_path, entry) in migration.actions_of(action) {
                if let Some(entry) = entry {
                    let data = migration.load_blob_data(&entry.oid)?;
                    self.write_file(file_path, &data, entry.mode)?;
                }
            }
        }

        Ok(())
    }
}
