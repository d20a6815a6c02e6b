//! Prompt text and structured-output JSON schemas for the Ollama flow.
//!
//! Generation is a two-step chat: first the merged creature's name, then
//! 1-4 emoji for that name. Both steps pin the model down with an Ollama
//! `format` JSON schema, and the prompt "spice" escalates with tier so
//! low tiers stay concrete while high tiers drift surreal.

use accrete_types::MergeMode;

/// A fully rendered system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message: constrains the model to the schema fields.
    pub system: String,

    /// User message: the actual generation request.
    pub user: String,
}

/// System message used for both steps.
const SYSTEM_PROMPT: &str = "You return ONLY the fields described by the provided JSON Schema.";

/// Instruction for Fusion merges.
const FUSION_INSTRUCTION: &str =
    "Combine the creatures into a SINGLE hybrid creature with a 1-2 word name.";

/// Instruction for Action merges.
const ACTION_INSTRUCTION: &str =
    "The FIRST creature acts on the others; produce a SINGLE child creature with a 1-2 word name.";

/// Render the name-generation prompt for a merge.
pub fn name_prompt(source_names: &[String], target_tier: u32, mode: MergeMode) -> RenderedPrompt {
    let spice = spice_for_tier(target_tier);
    let instruction = match mode {
        MergeMode::Fusion => FUSION_INSTRUCTION,
        MergeMode::Action => ACTION_INSTRUCTION,
    };
    let items = source_names.join(", ");
    RenderedPrompt {
        system: SYSTEM_PROMPT.to_owned(),
        user: format!("Tier {target_tier}. {spice} {instruction} Items: {items}"),
    }
}

/// Render the emoji-generation prompt for an already-named creature.
pub fn emoji_prompt(merged_name: &str) -> RenderedPrompt {
    RenderedPrompt {
        system: SYSTEM_PROMPT.to_owned(),
        user: format!(
            "Give 1-4 emoji that best represent the creature named '{merged_name}'. \
             Respond ONLY with emoji, no text."
        ),
    }
}

/// Tier-scaled tone guidance: concrete at the bottom, surreal at the top.
const fn spice_for_tier(target_tier: u32) -> &'static str {
    if target_tier >= 7 {
        "Become surreal, overflow with dreamlike metaphors."
    } else if target_tier >= 5 {
        "Allow abstract nouns and folklore hints."
    } else if target_tier >= 3 {
        "Allow mild mythic metaphors."
    } else {
        "Stay concrete and visual."
    }
}

/// Sampling temperature for a tier: creativity rises with tier, capped
/// well short of incoherence.
pub fn temperature_for_tier(target_tier: u32) -> f32 {
    let steps = target_tier.saturating_sub(2);
    (0.3 + 0.1 * steps_f32(steps)).min(1.2)
}

/// JSON schema for the name step: a single short string field.
pub fn name_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "minLength": 1, "maxLength": 40 }
        },
        "required": ["name"]
    })
}

/// JSON schema for the emoji step: a single 1-4 codepoint string field.
pub fn emoji_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "emoji": { "type": "string", "minLength": 1, "maxLength": 4 }
        },
        "required": ["emoji"]
    })
}

/// Tier step count as f32 (always tiny).
#[allow(clippy::cast_precision_loss)]
const fn steps_f32(steps: u32) -> f32 {
    steps as f32
}
