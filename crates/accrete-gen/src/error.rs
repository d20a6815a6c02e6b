//! Error types for the generation pipeline.
//!
//! These errors never escape the [`Generator`] boundary: every variant
//! is recovered by the deterministic fallback. They exist so the client
//! can log precisely *why* a fallback was synthesized.
//!
//! [`Generator`]: crate::generator::Generator

/// Errors that can occur while calling the generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The HTTP call failed or returned a non-success status.
    #[error("ollama request failed: {0}")]
    Http(String),

    /// The response body could not be parsed into the expected shape.
    #[error("ollama response parse failed: {0}")]
    Parse(String),

    /// The model returned a structurally valid but unusable payload
    /// (e.g. an empty name).
    #[error("ollama returned an unusable payload: {0}")]
    Unusable(String),
}
