//! Error types for the engine binary.

use accrete_core::config::ConfigError;

/// Errors that can occur during engine startup.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// Seed spawning could not proceed.
    #[error("spawn error: {reason}")]
    Spawn {
        /// Explanation of what made spawning impossible.
        reason: String,
    },
}
