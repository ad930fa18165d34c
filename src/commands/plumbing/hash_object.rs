use crate::areas::repository::Repository;
use crate::artifacts::objects::object::hash_object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::PitError;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Blob id of a file; stored in the database when `write` is set
    pub fn hash_file(&self, file: &Path, write: bool) -> anyhow::Result<ObjectId> {
        let path = self.path().join(file);
        if !path.is_file() {
            return Err(PitError::PathNotFound(file.to_path_buf()).into());
        }

        let content =
            std::fs::read(&path).with_context(|| format!("Unable to read {}", file.display()))?;

        if write {
            self.ensure_initialized()?;
            self.database().write_object(ObjectType::Blob, &content)
        } else {
            hash_object(ObjectType::Blob, &content)
        }
    }

    pub fn hash_object(&self, file: &str, write: bool) -> anyhow::Result<()> {
        let object_id = self.hash_file(Path::new(file), write)?;

        writeln!(self.writer(), "{}", object_id)?;

        Ok(())
    }
}
