use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionClient, CompletionRequest, Message};
use crate::config::LlmConfig;
use crate::error::LlmError;

/// Client for the YandexGPT foundation-models completion endpoint.
#[derive(Debug, Clone)]
pub struct YandexGptClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl YandexGptClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Api-Key {api_key}"))
                .map_err(|e| LlmError::Network(format!("invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    model_uri: &'a str,
    completion_options: CompletionOptions,
    messages: &'a [Message],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f64,
    // The API takes the token budget as a string.
    max_tokens: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    result: WireResult,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    message: AlternativeMessage,
}

#[derive(Debug, Deserialize)]
struct AlternativeMessage {
    text: String,
}

#[async_trait]
impl CompletionClient for YandexGptClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let (Some(api_key), Some(model_uri)) = (&self.config.api_key, &self.config.model_uri)
        else {
            return Err(LlmError::MissingApiKey);
        };

        let body = WireRequest {
            model_uri,
            completion_options: CompletionOptions {
                stream: false,
                temperature: request.temperature,
                max_tokens: request.max_tokens.to_string(),
            },
            messages: &request.messages,
        };

        debug!(model_uri = model_uri.as_str(), "YandexGPT completion request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .headers(self.headers(api_key)?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        payload
            .result
            .alternatives
            .into_iter()
            .next()
            .map(|alternative| alternative.message.text)
            .ok_or_else(|| LlmError::MalformedResponse("no alternatives in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_request_shape() {
        let messages = vec![Message::system("sys"), Message::user("hello")];
        let body = WireRequest {
            model_uri: "gpt://folder/yandexgpt/latest",
            completion_options: CompletionOptions {
                stream: false,
                temperature: 0.5,
                max_tokens: "2000".to_string(),
            },
            messages: &messages,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "modelUri": "gpt://folder/yandexgpt/latest",
                "completionOptions": {"stream": false, "temperature": 0.5, "maxTokens": "2000"},
                "messages": [
                    {"role": "system", "text": "sys"},
                    {"role": "user", "text": "hello"}
                ]
            })
        );
    }

    #[test]
    fn test_wire_response_parsing() {
        let raw = r#"{
            "result": {
                "alternatives": [{"message": {"role": "assistant", "text": "{}"}, "status": "ALTERNATIVE_STATUS_FINAL"}],
                "usage": {"inputTextTokens": "10"},
                "modelVersion": "1"
            }
        }"#;

        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result.alternatives[0].message.text, "{}");
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuit() {
        let client = YandexGptClient::new(LlmConfig::default()).unwrap();
        let err = client
            .complete(&CompletionRequest::new("sys", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
