//! Typed failure kinds surfaced through `anyhow` chains.
//!
//! Most errors in this crate are plain `anyhow` contexts, but a few
//! conditions are worth matching on programmatically: a corrupt index file,
//! a missing object during traversal or packing, a commit that cannot be
//! walked, and transport failures while talking to a remote. Callers can
//! downcast an `anyhow::Error` to these types to tell the cases apart.

use std::fmt;

/// Failures rooted in the local repository state.
#[derive(Debug)]
pub enum RepositoryError {
    /// The index file is unreadable: bad signature, unsupported version,
    /// truncated entry data, or checksum mismatch.
    CorruptIndex(String),

    /// An object referenced by the graph is absent from the object store.
    ObjectNotFound(String),

    /// An object expected to be a commit has another kind or cannot be
    /// parsed as one.
    MalformedCommit(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::CorruptIndex(reason) => write!(f, "corrupt index: {}", reason),
            RepositoryError::ObjectNotFound(oid) => write!(f, "object not found: {}", oid),
            RepositoryError::MalformedCommit(reason) => write!(f, "malformed commit: {}", reason),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Failures on the wire while talking to a remote repository.
///
/// Covers everything that keeps a push from being judged by the server.
/// A push the server received and turned down is not an error here, it
/// surfaces through the push outcome instead.
#[derive(Debug)]
pub enum RemoteError {
    /// Transport-level or HTTP-status failure on a remote round-trip.
    AuthOrNetwork { url: String, source: reqwest::Error },
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::AuthOrNetwork { url, source } => {
                write!(f, "authentication or network failure for {}: {}", url, source)
            }
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::AuthOrNetwork { source, .. } => Some(source),
        }
    }
}
