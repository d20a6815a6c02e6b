//! Ollama chat client with structured output.
//!
//! The flow is two chat calls (recovered behavior of the original
//! prototype): step one asks for the merged creature's name under a
//! name-only JSON schema, step two asks for 1-4 emoji for that name.
//! A failed emoji step degrades to the first source emoji rather than
//! failing the whole generation; a failed name step is a hard error the
//! [`Generator`] boundary converts to a fallback.
//!
//! [`Generator`]: crate::generator::Generator

use accrete_types::{GenerationResult, MergeMode, PLACEHOLDER_EMOJI};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GenError;
use crate::prompt::{self, RenderedPrompt};

/// Name-step payload the model must return.
#[derive(Debug, Deserialize)]
struct NamePayload {
    /// The merged creature's name.
    name: String,
}

/// Emoji-step payload the model must return.
#[derive(Debug, Deserialize)]
struct EmojiPayload {
    /// 1-4 emoji for the named creature.
    emoji: String,
}

/// Client for a local Ollama chat endpoint.
pub struct OllamaClient {
    /// Shared HTTP client.
    client: reqwest::Client,

    /// Full chat endpoint URL (e.g. `http://localhost:11434/api/chat`).
    chat_url: String,

    /// Model identifier.
    model: String,
}

impl OllamaClient {
    /// Create a client for the given endpoint and model.
    pub fn new(chat_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            chat_url: chat_url.to_owned(),
            model: model.to_owned(),
        }
    }

    /// Run the two-step generation flow.
    ///
    /// # Errors
    ///
    /// Returns [`GenError`] if the name step fails in transport, parse,
    /// or content. The emoji step is allowed to fail (partial results
    /// are acceptable: name plus a source emoji still plays).
    pub async fn try_generate(
        &self,
        source_names: &[String],
        source_emojis: &[String],
        target_tier: u32,
        mode: MergeMode,
    ) -> Result<GenerationResult, GenError> {
        let temperature = prompt::temperature_for_tier(target_tier);

        // Step 1: merged name.
        let name_prompt = prompt::name_prompt(source_names, target_tier, mode);
        let content = self
            .chat(&name_prompt, prompt::name_schema(), temperature)
            .await?;
        let payload: NamePayload = serde_json::from_str(content.trim())
            .map_err(|e| GenError::Parse(format!("name payload: {e}")))?;
        if payload.name.trim().is_empty() {
            return Err(GenError::Unusable("empty name".to_owned()));
        }
        let name = payload.name.trim().to_owned();
        debug!(%name, target_tier, "merged name generated");

        // Step 2: emoji for the merged name. Degrades, never fails.
        let emoji = match self.emoji_for(&name, temperature).await {
            Ok(emoji) => emoji,
            Err(error) => {
                warn!(%error, %name, "emoji step failed, using source emoji");
                source_emojis
                    .iter()
                    .find(|e| !e.is_empty())
                    .map_or(PLACEHOLDER_EMOJI, String::as_str)
                    .to_owned()
            }
        };

        Ok(GenerationResult {
            emoji,
            name,
            gloss: String::new(),
            // The name schema carries no weight field; midpoint default.
            weight: 4,
            tags: std::collections::BTreeSet::new(),
        })
    }

    /// Step two: ask for emoji representing the merged name.
    async fn emoji_for(&self, merged_name: &str, temperature: f32) -> Result<String, GenError> {
        let rendered = prompt::emoji_prompt(merged_name);
        let content = self
            .chat(&rendered, prompt::emoji_schema(), temperature)
            .await?;
        let payload: EmojiPayload = serde_json::from_str(content.trim())
            .map_err(|e| GenError::Parse(format!("emoji payload: {e}")))?;
        if payload.emoji.is_empty() {
            return Err(GenError::Unusable("empty emoji".to_owned()));
        }
        Ok(payload.emoji)
    }

    /// Send one chat request with an Ollama structured-output format and
    /// return the assistant message content.
    async fn chat(
        &self,
        rendered: &RenderedPrompt,
        format: serde_json::Value,
        temperature: f32,
    ) -> Result<String, GenError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": rendered.system},
                {"role": "user", "content": rendered.user}
            ],
            "stream": false,
            "format": format,
            "options": { "temperature": temperature }
        });

        let response = self
            .client
            .post(&self.chat_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(GenError::Http(format!("ollama returned {status}: {error_body}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenError::Parse(format!("response body: {e}")))?;

        extract_chat_content(&json)
    }
}

impl core::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("chat_url", &self.chat_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Extract `message.content` from an Ollama chat response.
fn extract_chat_content(json: &serde_json::Value) -> Result<String, GenError> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| GenError::Parse("response missing message.content".to_owned()))
}
