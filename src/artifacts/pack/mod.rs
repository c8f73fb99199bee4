//! Pack stream encoding
//!
//! A pack bundles a set of objects into one byte stream for transport:
//! a fixed header, one varint-prefixed zlib-compressed record per object,
//! and a trailing SHA-1 digest over everything before it.
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "PACK" (4 bytes)
//!   - Version: 2 (4 bytes, big-endian)
//!   - Object count (4 bytes, big-endian)
//!
//! Records (one per object, in id order):
//!   - Varint header carrying kind and content length
//!   - Independently zlib-compressed content
//!
//! Trailer (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod builder;
pub mod pkt_line;

/// Magic bytes opening every pack stream
pub const PACK_SIGNATURE: &[u8; 4] = b"PACK";

/// Pack stream format version
pub const PACK_VERSION: u32 = 2;
