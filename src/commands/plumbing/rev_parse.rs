use crate::areas::repository::Repository;

impl Repository {
    pub fn rev_parse(&self, revision: &str) -> anyhow::Result<()> {
        let object_id = self.resolve_revision(revision)?;

        writeln!(self.writer(), "{}", object_id)?;

        Ok(())
    }
}
