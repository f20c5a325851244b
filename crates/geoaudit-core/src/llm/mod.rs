//! Completion service abstraction
//!
//! The fix suggester and the GEO scorer only need "submit a prompt, receive text
//! or fail". `CompletionClient` is that seam; `YandexGptClient` is the production
//! implementation.

mod yandex;

pub use yandex::YandexGptClient;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// A single non-streaming completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            temperature: 0.1,
            max_tokens: 2000,
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Raw text of the first alternative.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

#[async_trait]
impl<'a, C: CompletionClient + ?Sized> CompletionClient for &'a C {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        (**self).complete(request).await
    }
}

/// Remove a surrounding markdown code fence (with or without a `json` tag).
pub fn strip_code_fences(text: &str) -> &str {
    static FENCE_START: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^```(?:json|JSON)?\s*").expect("invalid fence regex"));
    static FENCE_END: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s*```$").expect("invalid fence regex"));

    let text = text.trim();
    let start = FENCE_START.find(text).map_or(0, |m| m.end());
    let text = &text[start..];
    let end = FENCE_END.find(text).map_or(text.len(), |m| m.start());
    &text[..end]
}

/// The outermost `{...}` span of `text`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    static OBJECT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("invalid object regex"));
    OBJECT.find(text).map(|m| m.as_str())
}
