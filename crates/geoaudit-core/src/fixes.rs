//! AI fix suggestions for individual findings
//!
//! `FixSuggester::suggest` never fails: a missing credential, a transport error or
//! an undecodable answer all produce a fallback that keeps the original snippet.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LlmError;
use crate::llm::{CompletionClient, CompletionRequest, strip_code_fences};

const SYSTEM_PROMPT: &str = "Ты - эксперт по SEO оптимизации и веб-разработке. \
Проанализируй проблему и предложи конкретное исправление.";

/// Why a suggestion fell back to the original snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixError {
    ApiKeyMissing,
    ApiCallError,
    InvalidResponse,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSuggestion {
    pub fixed_code: String,
    pub explanation: String,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FixError>,
}

impl FixSuggestion {
    /// Fallback that keeps `current_code` unchanged.
    pub fn fallback(current_code: &str, error: FixError, detail: Option<&str>) -> Self {
        let (explanation, change) = match error {
            FixError::ApiKeyMissing => (
                "API ключ YandexGPT не настроен. Укажите API ключ, чтобы получать AI-исправления."
                    .to_string(),
                Some("Требуется настройка API ключа"),
            ),
            FixError::ApiCallError => (
                format!(
                    "Ошибка при обращении к YandexGPT API: {}",
                    detail.unwrap_or("неизвестная ошибка")
                ),
                Some("Не удалось получить исправление от AI"),
            ),
            FixError::InvalidResponse => (
                format!(
                    "YandexGPT вернул ответ, который не удалось разобрать как JSON: {}",
                    detail.unwrap_or("пустой ответ")
                ),
                Some("Не удалось получить исправление от AI"),
            ),
            FixError::Disabled => ("AI-исправления отключены.".to_string(), None),
        };

        Self {
            fixed_code: current_code.to_string(),
            explanation,
            changes: change.into_iter().map(str::to_string).collect(),
            error: Some(error),
        }
    }
}

/// Asks the completion service how to fix one problem.
#[derive(Debug, Clone)]
pub struct FixSuggester<C> {
    client: C,
}

impl<C: CompletionClient> FixSuggester<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn suggest(&self, problem: &str, current_code: &str, url: &str) -> FixSuggestion {
        let request = CompletionRequest::new(SYSTEM_PROMPT, build_prompt(problem, current_code, url))
            .temperature(0.1)
            .max_tokens(2000);

        let raw = match self.client.complete(&request).await {
            Ok(raw) => raw,
            Err(LlmError::MissingApiKey) => {
                return FixSuggestion::fallback(current_code, FixError::ApiKeyMissing, None);
            }
            Err(err) => {
                warn!(url, error = %err, "AI fix request failed");
                return FixSuggestion::fallback(
                    current_code,
                    FixError::ApiCallError,
                    Some(&err.to_string()),
                );
            }
        };

        match parse_suggestion(&raw) {
            Ok(suggestion) => suggestion,
            Err(err) => {
                warn!(url, error = %err, "AI fix response is not valid JSON");
                FixSuggestion::fallback(current_code, FixError::InvalidResponse, Some(&err.to_string()))
            }
        }
    }
}

fn parse_suggestion(raw: &str) -> Result<FixSuggestion, serde_json::Error> {
    let mut suggestion: FixSuggestion = serde_json::from_str(strip_code_fences(raw))?;
    // The model does not get to set the fallback marker.
    suggestion.error = None;
    Ok(suggestion)
}

fn build_prompt(problem: &str, current_code: &str, url: &str) -> String {
    format!(
        "КОНТЕКСТ:\n\
         - URL страницы: {url}\n\
         - Найденная проблема: {problem}\n\
         - Текущий код: {current_code}\n\
         \n\
         ТРЕБОВАНИЯ:\n\
         1. Исправленный код должен быть валидным HTML или JSON-LD\n\
         2. Код должен соответствовать стандартам W3C\n\
         3. Учитывай лучшие практики SEO\n\
         4. Код должен хорошо читаться поисковыми системами и LLM\n\
         \n\
         ОТВЕТ - ТОЛЬКО JSON-объект с полями:\n\
         {{\"fixed_code\": \"исправленный код целиком\", \
         \"explanation\": \"кратко по-русски: что исправлено и почему\", \
         \"changes\": [\"изменение 1\", \"изменение 2\"]}}\n\
         Никакого текста вне JSON."
    )
}
