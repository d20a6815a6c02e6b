//! Shared type definitions for the Accrete simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Accrete workspace: the body entity and its tier/points math, the merge
//! mode and combo-key canonicalization, the generation result produced by
//! the naming backend, and the canon entry persisted to disk.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`body`] -- The [`Body`] entity, tier/points/mass math, slugs
//! - [`merge`] -- [`MergeMode`], combo keys, [`GenerationResult`]
//! - [`canon`] -- [`CanonEntry`], the persisted canon record

pub mod body;
pub mod canon;
pub mod ids;
pub mod merge;

// Re-export all public types at crate root for convenience.
pub use body::{
    Body, MAX_WEIGHT, MIN_WEIGHT, PLACEHOLDER_EMOJI, highest_tier_from_points, points_for_tier,
    slugify,
};
pub use canon::CanonEntry;
pub use ids::{BodyId, MergeId};
pub use merge::{GenerationResult, MergeMode, combo_key};
