//! Index (staging area)
//!
//! The index tracks which files should be included in the next commit.
//! It maintains metadata about files including their mode, timestamps, and
//! SHA-1 hashes.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: Signature, version, and entry count
//! - Entries: Staged files with metadata, in first-staged order
//! - Checksum: SHA-1 hash of the entire index for integrity verification
//!
//! Entry order is the order paths were first staged. Re-staging a path
//! replaces its entry in place instead of moving it, so trees built from the
//! index hash deterministically across repeated `add` runs.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::ops::DerefMut;
use std::path::Path;

/// Staging area persisted at `.git/index`
///
/// Uses a trailing checksum for integrity verification and advisory file
/// locks against concurrent invocations.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Staged files in first-staged order
    entries: Vec<IndexEntry>,
    /// Index file header metadata
    header: IndexHeader,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    /// Create a new empty index
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the index file (typically `.git/index`)
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: Vec::new(),
            header: IndexHeader::new(String::from(SIGNATURE), VERSION, 0),
            changed: false,
        }
    }

    /// Get the path to the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop all in-memory state
    fn clear(&mut self) {
        self.entries.clear();
        self.header = IndexHeader::empty();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// Reads the index file, parses the header and entries, and verifies
    /// the checksum. A missing index file is an empty index, not an error;
    /// nothing is created on disk.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        // if the index file is empty, return early
        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header(&self, reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header_reader = std::io::Cursor::new(header_bytes);
        let header = IndexHeader::deserialize(header_reader)?;

        if header.marker != SIGNATURE {
            return Err(RepositoryError::CorruptIndex(String::from(
                "invalid index file signature",
            ))
            .into());
        }

        if header.version != VERSION {
            return Err(RepositoryError::CorruptIndex(format!(
                "unsupported index file version: {}",
                header.version
            ))
            .into());
        }

        Ok(header.entries_count)
    }

    /// Parse all entries from the index file
    ///
    /// Reads exactly the number of entries the header declares, handling
    /// variable-length paths with 8-byte alignment. Truncated entry data
    /// surfaces as a corrupt-index error from the checksummed reader.
    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let entry_bytes = reader.read(ENTRY_MIN_SIZE)?;
            let mut entry_bytes = entry_bytes.to_vec();

            while entry_bytes[entry_bytes.len() - 1] != 0 {
                entry_bytes = [entry_bytes, reader.read(ENTRY_BLOCK)?.to_vec()].concat();
            }

            let entry_reader = std::io::Cursor::new(Bytes::from(entry_bytes));
            let entry = IndexEntry::deserialize(entry_reader)?;

            self.entries.push(entry);
        }

        self.header.entries_count = entries_count;

        Ok(())
    }

    /// Insert an entry, replacing any existing entry with the same path
    ///
    /// A replaced entry keeps its position; new paths append at the end.
    pub fn add(&mut self, entry: IndexEntry) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.name == entry.name)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;
    }

    /// Rewrite the whole index file from the in-memory state
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the index file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        self.header = IndexHeader {
            entries_count: self.entries.len() as u32,
            ..self.header.clone()
        };
        let header_bytes = self.header.serialize()?;
        writer.write(&header_bytes)?;

        for entry in &self.entries {
            let entry_bytes = entry.serialize()?;
            writer.write(&entry_bytes)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }
}
