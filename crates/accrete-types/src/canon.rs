//! The canon entry record persisted by the canonical result store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::merge::GenerationResult;

/// A single persisted canon record: a combo key, the tier it was merged
/// at, the generation result, and the UTC creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonEntry {
    /// The canonical combo key this result is stored under.
    pub key: String,

    /// The target tier of the merge that produced this result.
    pub tier: u32,

    /// The generated (or fallback-synthesized) result.
    pub result: GenerationResult,

    /// UTC timestamp of first creation.
    pub created: DateTime<Utc>,
}

impl CanonEntry {
    /// Create an entry stamped with the current UTC time.
    pub fn new(key: &str, tier: u32, result: GenerationResult) -> Self {
        Self {
            key: key.to_owned(),
            tier,
            result,
            created: Utc::now(),
        }
    }
}
