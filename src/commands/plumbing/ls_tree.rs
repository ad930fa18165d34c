use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

impl Repository {
    /// Entries of a tree-ish, one level deep or recursively flattened
    ///
    /// Commits stand for their tree. Recursive listings contain leaves only,
    /// keyed by their full path.
    pub fn list_tree(
        &self,
        tree_ish: &str,
        recursive: bool,
    ) -> anyhow::Result<Vec<(String, DatabaseEntry)>> {
        let object_id = self.resolve_revision(tree_ish)?;
        let tree_oid = self.peel_to_tree(object_id)?;

        if recursive {
            Ok(self
                .database()
                .flatten_tree(&tree_oid)?
                .into_iter()
                .map(|(path, entry)| (path.to_string_lossy().into_owned(), entry))
                .collect())
        } else {
            Ok(self
                .database()
                .parse_object_as_tree(&tree_oid)?
                .into_entries()
                .collect())
        }
    }

    fn peel_to_tree(&self, object_id: ObjectId) -> anyhow::Result<ObjectId> {
        match self.database().get_object_type(&object_id)? {
            ObjectType::Commit => Ok(self
                .database()
                .parse_object_as_commit(&object_id)?
                .tree_oid()
                .clone()),
            _ => Ok(object_id),
        }
    }

    pub fn ls_tree(&self, tree_ish: &str, recursive: bool) -> anyhow::Result<()> {
        for (name, entry) in self.list_tree(tree_ish, recursive)? {
            let object_type = if entry.is_tree() {
                ObjectType::Tree
            } else {
                ObjectType::Blob
            };

            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode,
                object_type,
                entry.oid,
                name
            )?;
        }

        Ok(())
    }
}
