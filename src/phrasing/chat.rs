use super::{PhraseError, Phraser};
use crate::scorer::feedback::Suggestion;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = "You are a professional movement coach. \
Rewrite the coaching tip you are given as one short, encouraging sentence. \
Reply with the sentence only.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Phrases suggestions through an OpenAI-compatible chat-completion endpoint.
/// Blocking; do not call from inside an async runtime.
pub struct ChatPhraser {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatPhraser {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PhraseError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PhraseError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    /// Returns `None` when no key is configured.
    pub fn from_env(timeout: Duration) -> Option<Self> {
        let api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())?;
        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, base_url, model, timeout).ok()
    }
}

impl Phraser for ChatPhraser {
    fn phrase(&self, suggestion: Suggestion) -> Result<String, PhraseError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: suggestion.text(),
                },
            ],
            temperature: 0.7,
        };

        debug!("Phrasing '{}' via {}", suggestion, self.model);

        let response: ChatResponse = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| PhraseError::Request(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(PhraseError::Empty)?;

        let text = strip_code_fences(&content);
        if text.is_empty() {
            return Err(PhraseError::Empty);
        }
        Ok(text.to_string())
    }
}

/// Models sometimes wrap replies in Markdown fences.
fn strip_code_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    for prefix in ["```json", "```text", "```"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest;
            break;
        }
    }
    text.strip_suffix("```").unwrap_or(text).trim()
}
