//! Deterministic fallback synthesis.
//!
//! When the generation backend fails, the merged creature still needs a
//! name and an emoji. The fallback is a pure function of its inputs --
//! no randomness, no external dependency -- so identical merges always
//! synthesize byte-identical results.

use accrete_types::{GenerationResult, MergeMode, PLACEHOLDER_EMOJI};

/// Separator between source names in a fallback name.
const NAME_SEPARATOR: &str = "-";

/// Tag attached to every fallback result.
const FALLBACK_TAG: &str = "fallback";

/// Gloss attached to every fallback result.
const FALLBACK_GLOSS: &str = "Locally synthesized.";

/// Synthesize a deterministic result from the merge inputs.
///
/// - Fusion names join the first and last source; Action names join the
///   first and second (or the first with itself when it is alone).
/// - The emoji is the first non-empty source emoji, else the placeholder.
/// - The weight is `clamp(2 + tier/2, 1, 7)` with integer division.
pub fn synthesize(
    names: &[String],
    emojis: &[String],
    target_tier: u32,
    mode: MergeMode,
) -> GenerationResult {
    let first = names.first().map_or("Unknown", String::as_str);
    let name = match mode {
        MergeMode::Fusion => {
            let last = names.last().map_or(first, String::as_str);
            format!("{first}{NAME_SEPARATOR}{last}")
        }
        MergeMode::Action => {
            let second = names.get(1).map_or(first, String::as_str);
            format!("{first}{NAME_SEPARATOR}{second}")
        }
    };

    let emoji = emojis
        .iter()
        .find(|e| !e.is_empty())
        .map_or(PLACEHOLDER_EMOJI, String::as_str)
        .to_owned();

    GenerationResult {
        emoji,
        name,
        gloss: FALLBACK_GLOSS.to_owned(),
        weight: fallback_weight(target_tier),
        tags: [FALLBACK_TAG.to_owned()].into_iter().collect(),
    }
}

/// Fallback weight: `clamp(2 + tier/2, 1, 7)` (integer division).
pub fn fallback_weight(target_tier: u32) -> u8 {
    let raw = 2_u32
        .saturating_add(target_tier.checked_div(2).unwrap_or(0))
        .clamp(1, 7);
    u8::try_from(raw).unwrap_or(7)
}
