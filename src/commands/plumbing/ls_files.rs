use crate::areas::repository::Repository;

impl Repository {
    pub fn ls_files(&self) -> anyhow::Result<()> {
        let index = self.load_index()?;

        for path in index.paths() {
            writeln!(self.writer(), "{}", path.display())?;
        }

        Ok(())
    }
}
