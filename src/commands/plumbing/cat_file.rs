use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox, Packable};

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileOutput {
    /// The object kind
    Type,
    /// The content: raw for blobs and commits, one entry per line for trees
    Pretty,
}

impl Repository {
    pub fn cat_file(&self, object: &str, output: CatFileOutput) -> anyhow::Result<()> {
        let object_id = self.resolve_revision(object)?;
        let object = self.database().parse_object(&object_id)?;

        match (output, object) {
            (CatFileOutput::Type, object) => writeln!(self.writer(), "{}", object.object_type())?,
            (CatFileOutput::Pretty, ObjectBox::Blob(blob)) => {
                self.writer().write_all(blob.content())?;
            }
            (CatFileOutput::Pretty, ObjectBox::Tree(tree)) => {
                let listing = tree.display()?;
                if !listing.is_empty() {
                    writeln!(self.writer(), "{}", listing)?;
                }
            }
            (CatFileOutput::Pretty, ObjectBox::Commit(commit)) => {
                self.writer().write_all(&commit.serialize()?)?;
            }
        }

        Ok(())
    }
}
