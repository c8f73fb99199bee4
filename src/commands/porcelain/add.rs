use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Stage files for the next commit
    ///
    /// Each path is stored as a blob and upserted into the index; the index
    /// file is rewritten once after all paths are processed, so a failure on
    /// any path leaves the on-disk index untouched.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        for path in paths {
            let path = self.workspace().relativize(Path::new(path))?;

            let blob = self
                .workspace()
                .parse_blob(&path)
                .with_context(|| format!("Failed to read file: {:?}", path))?;
            let stat = self
                .workspace()
                .stat_file(&path)
                .with_context(|| format!("Failed to stat file: {:?}", path))?;

            let blob_id = self.database().store(blob)?;
            index.add(IndexEntry::new(path, blob_id, stat));
        }

        index.write_updates()?;

        writeln!(self.writer(), "Added {} file(s) to the index.", paths.len())?;

        Ok(())
    }
}
