use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{LlmClient, GENERATION_SETTINGS};
use super::{clip_error_body, map_transport_error, LlmError};

/// OpenAI-compatible `/v1/chat/completions` client.
pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::Init("OpenAI API key is required".into()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Init(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, prompt: &str, system: &str) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: system.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: prompt.into(),
            },
        ],
        temperature: GENERATION_SETTINGS.temperature,
        top_p: GENERATION_SETTINGS.top_p,
        max_tokens: GENERATION_SETTINGS.max_output_tokens,
        stream: false,
    }
}

fn extract_content(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
}

impl LlmClient for OpenAiClient {
    fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = build_request(&self.model, prompt, system);

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "OpenAI-compatible request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: clip_error_body(&body),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        extract_content(parsed).ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_has_system_then_user() {
        let body = serde_json::to_value(build_request("gpt-4o-mini", "dados", "regras")).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "regras");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "dados");
        assert_eq!(body["stream"], false);
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn extracts_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        }))
        .unwrap();
        assert_eq!(extract_content(response).as_deref(), Some("ok"));
    }

    #[test]
    fn missing_or_null_content_is_none() {
        let empty: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(extract_content(empty).is_none());

        let null: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": null}}]
        }))
        .unwrap();
        assert!(extract_content(null).is_none());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client =
            OpenAiClient::new("https://api.openai.com/", "k", "gpt-4o-mini", Duration::from_secs(10)).unwrap();
        assert_eq!(client.base_url, "https://api.openai.com");
    }

    #[test]
    fn empty_key_rejected() {
        let result = OpenAiClient::new("https://api.openai.com", "", "m", Duration::from_secs(10));
        assert!(matches!(result, Err(LlmError::Init(_))));
    }
}
