//! Runtime configuration for the analyzer and the completion service

use std::env;
use std::time::Duration;

/// Default completion endpoint (YandexGPT foundation models API).
pub const DEFAULT_LLM_ENDPOINT: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";

/// Browser-like user agent sent with page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Credentials and endpoint of the completion service.
///
/// Both `api_key` and `model_uri` are optional: when either is missing every AI
/// call takes the "credential missing" fallback instead of failing.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model_uri: Option<String>,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_uri: None,
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl LlmConfig {
    /// Load from `YANDEX_API_KEY`, `YANDEX_MODEL_URI` / `YANDEX_FOLDER_ID` and
    /// `YANDEX_LLM_ENDPOINT`.
    pub fn from_env() -> Self {
        let model_uri = optional_env("YANDEX_MODEL_URI").or_else(|| {
            optional_env("YANDEX_FOLDER_ID").map(|folder| model_uri_for_folder(&folder))
        });

        Self {
            api_key: optional_env("YANDEX_API_KEY"),
            model_uri,
            endpoint: optional_env("YANDEX_LLM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_LLM_ENDPOINT.to_string()),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model_uri(mut self, model_uri: impl Into<String>) -> Self {
        self.model_uri = Some(model_uri.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// True when both the key and the model are known.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.model_uri.is_some()
    }

    /// Log the configuration without leaking the key.
    pub fn log_redacted(&self) {
        tracing::info!(
            endpoint = self.endpoint.as_str(),
            model_uri = self.model_uri.as_deref().unwrap_or("<unset>"),
            api_key = if self.api_key.is_some() { "<set>" } else { "<unset>" },
            "Completion service configuration"
        );
    }
}

/// Settings of a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub fetch_timeout: Duration,
    pub user_agent: String,
    /// Cap on question sentences kept as examples.
    pub question_examples: usize,
    /// Ask the completion service for fix suggestions.
    pub ai_fixes: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            question_examples: 3,
            ai_fixes: true,
        }
    }
}

fn model_uri_for_folder(folder_id: &str) -> String {
    format!("gpt://{folder_id}/yandexgpt/latest")
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
