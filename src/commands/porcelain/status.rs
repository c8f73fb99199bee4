use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// List the staged files, one line per index entry
    ///
    /// Entries print in index order as octal mode, object id, and path.
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        for entry in index.entries() {
            writeln!(
                self.writer(),
                "{:o} {} {}",
                entry.metadata.mode,
                entry.oid,
                entry.name.display()
            )?;
        }

        Ok(())
    }
}
