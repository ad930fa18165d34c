use crate::areas::repository::Repository;

impl Repository {
    /// Print `<oid> <refname>` for every loose and packed ref
    pub fn show_ref(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (refname, oid) in self.refs().list_refs()? {
            writeln!(self.writer(), "{} {}", oid, refname)?;
        }

        Ok(())
    }
}
