use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::PitError;

impl Repository {
    /// Fold the index into trees, store them bottom-up and return the root id
    pub fn store_index_tree(&self) -> anyhow::Result<ObjectId> {
        let index = self.load_index()?;
        if index.is_empty() {
            return Err(PitError::EmptyIndex.into());
        }

        let tree = Tree::build(index.entries())?;
        tree.traverse(&mut |subtree: &Tree| self.database().store(subtree).map(|_| ()))?;

        let tree_id = tree.object_id()?;
        tracing::debug!(oid = %tree_id, entries = index.len(), "wrote index tree");

        Ok(tree_id)
    }

    pub fn write_tree(&self) -> anyhow::Result<()> {
        let tree_id = self.store_index_tree()?;

        writeln!(self.writer(), "{}", tree_id)?;

        Ok(())
    }
}
