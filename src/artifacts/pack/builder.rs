use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pack::{PACK_SIGNATURE, PACK_VERSION};
use byteorder::WriteBytesExt;
use bytes::Bytes;
use derive_new::new;
use sha1::{Digest, Sha1};
use std::collections::BTreeSet;
use std::io::Write;

/// Encodes a set of objects into a single pack stream
///
/// Objects are emitted in id order, so the same set always produces the same
/// bytes. Each record opens with a varint header: the first byte carries the
/// object kind in its high nibble and the low four bits of the content
/// length; every following byte carries seven more length bits and has its
/// high bit set.
#[derive(new)]
pub struct PackBuilder<'d> {
    database: &'d Database,
}

impl PackBuilder<'_> {
    /// Build the pack stream for `objects`
    ///
    /// Every id must resolve in the object store; a missing object aborts
    /// the whole build rather than producing a partial pack.
    pub fn build(&self, objects: &BTreeSet<ObjectId>) -> anyhow::Result<Bytes> {
        let mut pack_bytes = Vec::new();
        pack_bytes.write_all(PACK_SIGNATURE)?;
        pack_bytes.write_u32::<byteorder::NetworkEndian>(PACK_VERSION)?;
        pack_bytes.write_u32::<byteorder::NetworkEndian>(objects.len() as u32)?;

        for object_id in objects {
            let (object_type, content) = self.database.retrieve(object_id)?;

            Self::write_record_header(&mut pack_bytes, object_type.pack_kind(), content.len())?;
            let compressed = Database::compress(content)?;
            pack_bytes.write_all(&compressed)?;
        }

        let mut hasher = Sha1::new();
        hasher.update(&pack_bytes);
        pack_bytes.write_all(&hasher.finalize())?;

        Ok(Bytes::from(pack_bytes))
    }

    fn write_record_header(
        writer: &mut impl Write,
        kind: u8,
        size: usize,
    ) -> anyhow::Result<()> {
        let mut size = size;
        writer.write_u8((kind << 4) | ((size & 0x0f) as u8))?;
        size >>= 4;

        while size > 0 {
            writer.write_u8(((size & 0x7f) as u8) | 0x80)?;
            size >>= 7;
        }

        Ok(())
    }
}
