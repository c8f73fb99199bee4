use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

/// Working directory of the repository
///
/// Resolves user-supplied paths against the repository root and reads file
/// content and metadata for staging.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a user-supplied path to a repository-relative one
    ///
    /// Absolute paths must live under the repository root; relative paths are
    /// taken as already relative to it. Paths escaping the root via `..` are
    /// rejected so index entries never reference files outside the workspace.
    pub fn relativize(&self, file_path: &Path) -> anyhow::Result<PathBuf> {
        let relative_path = if file_path.is_absolute() {
            file_path
                .strip_prefix(self.path.as_ref())
                .map_err(|_| {
                    anyhow::anyhow!("The specified path is outside the repository: {:?}", file_path)
                })?
                .to_path_buf()
        } else {
            file_path.to_path_buf()
        };

        if relative_path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            anyhow::bail!(
                "The specified path is outside the repository: {:?}",
                file_path
            );
        }

        Ok(relative_path)
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(file_path)?;
        Ok(Blob::new(data))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(file_path)?;

        Ok(Bytes::from(content))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let metadata = std::fs::metadata(self.path.join(file_path))?;

        Ok(EntryMetadata::from(&metadata))
    }
}
