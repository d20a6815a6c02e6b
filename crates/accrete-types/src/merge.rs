//! Merge modes, combo-key canonicalization, and generation results.
//!
//! A merge is framed in one of two narrative modes: **Fusion** (symmetric
//! combination) or **Action** (first source acts on the rest). The mode
//! and the case-insensitive multiset of source names form the combo key,
//! the content address under which a generated result is cached -- two
//! merges consuming different body instances with the same names collide
//! to the same key by design.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Narrative framing of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeMode {
    /// Symmetric combination of all sources into one child.
    Fusion,
    /// The first source acts on the rest.
    Action,
}

impl MergeMode {
    /// Mode for a target tier: tiers 1-2 are always Fusion; above that,
    /// odd tiers are Action and even tiers are Fusion.
    pub const fn for_tier(target_tier: u32) -> Self {
        if target_tier <= 2 {
            Self::Fusion
        } else if target_tier % 2 == 1 {
            Self::Action
        } else {
            Self::Fusion
        }
    }

    /// Stable string form used in combo keys and prompts.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fusion => "Fusion",
            Self::Action => "Action",
        }
    }
}

impl core::fmt::Display for MergeMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical combo key for a merge: mode tag, then the source names
/// sorted case-insensitively and joined with `+`.
///
/// Order-independent in the source names; mode-dependent. Display-name
/// casing is preserved in the joined output, only the sort ignores case.
pub fn combo_key(names: &[String], mode: MergeMode) -> String {
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort_by_cached_key(|name| name.to_lowercase());
    let joined = sorted
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join("+");
    format!("{mode}:{joined}")
}

/// Default weight when a generation pathway omits it (midpoint of the
/// `[1, 7]` range).
const fn default_weight() -> u8 {
    4
}

/// A named, emoji'd, weighted merge result.
///
/// Partial results are acceptable: some generation pathways only fill
/// name and emoji, so gloss, weight, and tags carry serde defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Emoji glyph for the merged creature (1-4 codepoints).
    pub emoji: String,

    /// Display name of the merged creature.
    pub name: String,

    /// Flavor text; empty when the pathway omits it.
    #[serde(default)]
    pub gloss: String,

    /// Weight in `[1, 7]`; midpoint 4 when the pathway omits it.
    #[serde(default = "default_weight")]
    pub weight: u8,

    /// Free-form tags; empty when the pathway omits them.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}
