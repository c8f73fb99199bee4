//! Tree object
//!
//! Trees snapshot the staged files as a flat list of records. Each record
//! pairs a file mode and path with the hash of a blob or nested tree.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<records>`
//! Each record: `<mode> <path>\0<20-byte-sha1>`
//!
//! Records keep the order of the index entries they were built from, so the
//! same staging sequence always produces the same tree hash.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Single record in a tree, pointing at a blob or a nested tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeRecord {
    pub mode: u32,
    pub path: PathBuf,
    pub oid: ObjectId,
}

/// Directory snapshot built from the index
#[derive(Debug, Clone, Default)]
pub struct Tree {
    records: Vec<TreeRecord>,
}

impl Tree {
    /// Build a tree from index entries, keeping their order
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> Self {
        let records = entries
            .map(|entry| {
                TreeRecord::new(entry.metadata.mode, entry.name.clone(), entry.oid.clone())
            })
            .collect();

        Self { records }
    }

    pub fn records(&self) -> impl Iterator<Item = &TreeRecord> {
        self.records.iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for record in &self.records {
            let path = record
                .path
                .to_str()
                .context("Invalid path in tree record")?;

            let header = format!("{:o} {}", record.mode, path);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            record.oid.write_h40_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut records = Vec::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut path_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more records
            }
            // Must end with ' ' or it's malformed
            if *mode_bytes.last().unwrap() != b' ' {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }
            mode_bytes.pop(); // drop the space

            let mode_str = std::str::from_utf8(&mode_bytes)?;
            let mode = u32::from_str_radix(mode_str, 8)?;

            // Read "path\0"
            path_bytes.clear();
            let n = reader.read_until(b'\0', &mut path_bytes)?;
            if n == 0 || *path_bytes.last().unwrap() != b'\0' {
                return Err(anyhow::anyhow!("unexpected EOF in path"));
            }
            path_bytes.pop(); // drop NUL
            let path = PathBuf::from(std::str::from_utf8(&path_bytes)?);

            // Read object id
            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            records.push(TreeRecord::new(mode, path, oid));
        }

        Ok(Tree { records })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hello_oid() -> ObjectId {
        // oid of `blob 5\0hello`
        ObjectId::try_parse("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0".to_string()).unwrap()
    }

    #[test]
    fn empty_tree_hashes_to_the_well_known_oid() -> anyhow::Result<()> {
        let tree = Tree::default();

        assert_eq!(tree.serialize()?.as_ref(), b"tree 0\0");
        assert_eq!(
            tree.object_id()?.as_ref(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );

        Ok(())
    }

    #[rstest]
    fn record_order_determines_the_hash(hello_oid: ObjectId) -> anyhow::Result<()> {
        let staged_order = Tree {
            records: vec![
                TreeRecord::new(0o100644, PathBuf::from("z.txt"), hello_oid.clone()),
                TreeRecord::new(0o100644, PathBuf::from("a.txt"), hello_oid.clone()),
            ],
        };
        let name_order = Tree {
            records: vec![
                TreeRecord::new(0o100644, PathBuf::from("a.txt"), hello_oid.clone()),
                TreeRecord::new(0o100644, PathBuf::from("z.txt"), hello_oid),
            ],
        };

        assert_eq!(
            staged_order.object_id()?.as_ref(),
            "3fd72e658cf9017c32e0f1fe9d6afb37441d6017"
        );
        assert_eq!(
            name_order.object_id()?.as_ref(),
            "c5e5d18e54f072ebb3a477cc815537be2d6102f9"
        );

        Ok(())
    }

    #[rstest]
    fn deserialize_restores_records_in_order(hello_oid: ObjectId) -> anyhow::Result<()> {
        let tree = Tree {
            records: vec![
                TreeRecord::new(0o100644, PathBuf::from("z.txt"), hello_oid.clone()),
                TreeRecord::new(0o100755, PathBuf::from("bin/run.sh"), hello_oid),
            ],
        };

        let serialized = tree.serialize()?;
        let header_end = serialized
            .iter()
            .position(|&byte| byte == 0)
            .expect("serialized tree has a header");

        let parsed = Tree::deserialize(&serialized[header_end + 1..])?;
        assert_eq!(
            parsed.records().cloned().collect::<Vec<_>>(),
            tree.records().cloned().collect::<Vec<_>>()
        );

        Ok(())
    }
}
