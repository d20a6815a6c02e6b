//! Persistent canonical merge-result store for the Accrete simulation.
//!
//! The canon store is a key-to-result mapping that deduplicates
//! generation requests for identical merge combinations. It is loaded
//! wholesale from a JSON file at startup and rewritten wholesale on every
//! insert (write-through, no incremental append). A missing or corrupt
//! file is treated as an empty canon -- the store fails open, never fatal.
//!
//! # Modules
//!
//! - [`error`] -- [`CanonError`], the store's write-path error type
//! - [`store`] -- [`CanonStore`], load/get/put over the persisted file
//!
//! [`CanonError`]: error::CanonError
//! [`CanonStore`]: store::CanonStore

pub mod error;
pub mod store;

pub use error::CanonError;
pub use store::CanonStore;
