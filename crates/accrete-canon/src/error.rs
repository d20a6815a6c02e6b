//! Error types for the canon store.
//!
//! Only the write path can fail: reads fail open (a missing or corrupt
//! persisted file is an empty canon, see [`CanonStore::load`]).
//!
//! [`CanonStore::load`]: crate::store::CanonStore::load

/// Errors that can occur while persisting the canon file.
#[derive(Debug, thiserror::Error)]
pub enum CanonError {
    /// Failed to write the canon file to disk.
    #[error("failed to write canon file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to serialize the canon entries to JSON.
    #[error("failed to serialize canon entries: {source}")]
    Serialize {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
