//! Anthropic Messages API client used as the bullet generator

use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::llm::retry::RetryPolicy;
use crate::llm::{GenerationRequest, GeneratorError, SentenceGenerator};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl MessagesResponse {
    fn text(&self) -> Option<String> {
        let text: Vec<&str> = self
            .content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text.join("\n"))
        }
    }
}

pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    settings: ClientSettings,
    prompts: PromptTemplates,
}

impl AnthropicGenerator {
    pub fn new(api_key: String, settings: ClientSettings) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(settings.retry.attempt_timeout)
            .build()
            .map_err(|e| GeneratorError::Rejected(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            settings,
            prompts: PromptTemplates::default(),
        })
    }

    /// Build a generator when the API key variable is set
    pub fn from_env(api_key_env: &str, settings: ClientSettings) -> Option<Result<Self, GeneratorError>> {
        std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(key, settings))
    }

    async fn call_once(&self, prompt: &str) -> Result<Vec<String>, GeneratorError> {
        let body = MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            system: &self.prompts.system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(self.settings.retry.attempt_timeout.as_secs())
                } else {
                    GeneratorError::Transient(e.to_string())
                }
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| GeneratorError::Transient(format!("failed to read response body: {}", e)))?;

        if status.as_u16() == 429 || status.is_server_error() {
            return Err(GeneratorError::Transient(format!("HTTP {}: {}", status.as_u16(), raw)));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(GeneratorError::Rejected(format!("HTTP {}: {}", status.as_u16(), message)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&raw)
            .map_err(|e| GeneratorError::Transient(format!("malformed response: {}", e)))?;
        let text = parsed
            .text()
            .ok_or_else(|| GeneratorError::Transient("response contained no text".to_string()))?;

        Ok(text.lines().map(str::to_string).collect())
    }
}

impl SentenceGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<String>, GeneratorError> {
        let prompt = self.prompts.render_bullet_generation(&PromptParams {
            skills: request.skills.to_vec(),
            resume_content: request.resume_text.to_string(),
            job_content: request.job_text.to_string(),
        });

        debug!(
            "Requesting {} sentences from {} (prompt {} chars)",
            request.skills.len(),
            self.settings.model,
            prompt.len()
        );

        let prompt = prompt.as_str();
        self.settings
            .retry
            .run(|_| self.call_once(prompt))
            .await
    }

    fn name(&self) -> String {
        self.settings.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Line one"},{"type":"tool_use"},{"type":"text","text":"Line two"}]}"#,
        )
        .unwrap();

        assert_eq!(response.text().unwrap(), "Line one\nLine two");
    }

    #[test]
    fn test_response_without_text() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_from_env_requires_key() {
        let settings = ClientSettings {
            endpoint: ANTHROPIC_API_URL.to_string(),
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 1024,
            retry: RetryPolicy::default(),
        };
        assert!(AnthropicGenerator::from_env("RESUME_TAILOR_TEST_UNSET_KEY", settings).is_none());
    }
}
