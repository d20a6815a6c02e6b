//! Merge-result generation for the Accrete simulation.
//!
//! Given the names and emoji of the consumed bodies, a target tier, and a
//! merge mode, this crate produces a [`GenerationResult`] -- a name, an
//! emoji, and a weight for the merged creature. The primary backend is a
//! local Ollama chat endpoint with structured JSON output; every failure
//! path (transport, parse, malformed schema) resolves to a deterministic
//! fallback so gameplay never stalls. Generation is total at this
//! boundary: it cannot fail, only degrade.
//!
//! # Modules
//!
//! - [`error`] -- [`GenError`], internal failure taxonomy
//! - [`fallback`] -- deterministic fallback synthesis (pure function)
//! - [`prompt`] -- prompt text and structured-output JSON schemas
//! - [`client`] -- [`OllamaClient`], the two-step name-then-emoji flow
//! - [`generator`] -- [`Generator`] enum dispatch plus [`StubGenerator`]
//!
//! [`GenerationResult`]: accrete_types::GenerationResult
//! [`GenError`]: error::GenError
//! [`OllamaClient`]: client::OllamaClient
//! [`Generator`]: generator::Generator
//! [`StubGenerator`]: generator::StubGenerator

pub mod client;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod prompt;

pub use client::OllamaClient;
pub use error::GenError;
pub use generator::{Generator, StubGenerator};
