use is_executable::IsExecutable;
use std::path::Path;

/// Closed set of modes a tree entry can carry
#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FileMode {
    #[default]
    RegularFile,
    Executable,
    Symlink,
    Directory,
}

impl FileMode {
    /// Mode of a working-directory file, as it would be staged
    ///
    /// Symlinks are not followed. Directories are reported as such but are
    /// never staged themselves.
    pub fn of_path(path: &Path) -> anyhow::Result<Self> {
        let metadata = std::fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();

        Ok(if file_type.is_symlink() {
            FileMode::Symlink
        } else if file_type.is_dir() {
            FileMode::Directory
        } else if path.is_executable() {
            FileMode::Executable
        } else {
            FileMode::RegularFile
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::RegularFile => "100644",
            FileMode::Executable => "100755",
            FileMode::Symlink => "120000",
            FileMode::Directory => "40000",
        }
    }

    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        match mode {
            "100644" => Ok(FileMode::RegularFile),
            "100755" => Ok(FileMode::Executable),
            "120000" => Ok(FileMode::Symlink),
            "40000" | "040000" => Ok(FileMode::Directory),
            _ => Err(anyhow::anyhow!("invalid entry mode '{}'", mode)),
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, FileMode::Directory)
    }
}

impl From<FileMode> for String {
    fn from(mode: FileMode) -> Self {
        mode.as_str().to_string()
    }
}

impl TryFrom<String> for FileMode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        FileMode::from_octal_str(&value)
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
