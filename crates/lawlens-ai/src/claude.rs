//! Claude client (api.anthropic.com).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::AiError;
use crate::service::{TranslationService, check_status};

const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Deserialize)]
struct MessagesReply {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl ClaudeClient {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl TranslationService for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, AiError> {
        let url = format!("{}/messages", self.base_url);
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system,
            "messages": [{ "role": "user", "content": user }],
        });

        debug!(model = %self.model, "claude request");
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let reply: MessagesReply = resp.json().await?;
        let text = reply
            .content
            .into_iter()
            .next()
            .map(|b| b.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AiError::MalformedReply("no content text".into()))?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text_path() {
        let raw = r#"{
            "content": [{ "type": "text", "text": "translated text" }],
            "model": "claude-sonnet-4-5",
            "role": "assistant"
        }"#;
        let reply: MessagesReply = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.content[0].text, "translated text");
    }
}
