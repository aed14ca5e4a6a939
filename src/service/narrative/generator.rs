//! Text generation backends.
//!
//! Two HTTP implementations of [`NarrativeGenerator`]:
//! - **ChatCompletionsGenerator**: OpenAI-compatible `/chat/completions` (Groq by default)
//! - **GeminiGenerator**: Google Gemini `generateContent`

use anyhow::{Context, Result};
use async_trait::async_trait;
use rquest::Client;
use serde_json::json;

use super::prompt::NarrativeRequest;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// External collaborator producing narrative text for a prompt.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Run one generation and return the raw response text.
    async fn generate(&self, request: &NarrativeRequest) -> Result<String>;

    /// Human-readable name for logs.
    fn name(&self) -> &'static str;
}

fn require_key(api_key: Option<&str>) -> Result<&str> {
    match api_key {
        Some(key) if !key.is_empty() => Ok(key),
        _ => anyhow::bail!("API_KEY_MISSING: Please configure NARRATIVE_API_KEY"),
    }
}

// ============================================================================
// OPENAI-COMPATIBLE CHAT COMPLETIONS
// ============================================================================

pub struct ChatCompletionsGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsGenerator {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl NarrativeGenerator for ChatCompletionsGenerator {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String> {
        let api_key = require_key(self.api_key.as_deref())?;
        let api_url = format!("{}/chat/completions", self.base_url);

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_instruction },
                { "role": "user", "content": request.user_prompt }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_output_tokens
        });

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .body(request_body.to_string())
            .send()
            .await
            .context("Failed to send request to chat completions API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat completions API error {}: {}", status, error_text);
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse chat completions response")?;

        let text = response_json["choices"][0]["message"]["content"]
            .as_str()
            .context("Failed to extract text from chat completions response")?
            .to_string();

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "chat-completions"
    }
}

// ============================================================================
// GEMINI
// ============================================================================

pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiGenerator {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl NarrativeGenerator for GeminiGenerator {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String> {
        let api_key = require_key(self.api_key.as_deref())?;
        let api_url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let request_body = json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.user_prompt }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_output_tokens
            }
        });

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .body(request_body.to_string())
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, error_text);
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        let text = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .context("Failed to extract text from Gemini response")?
            .to_string();

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::http::{create_client, ClientType};
    use mockito::Matcher;
    use std::time::Duration;

    fn http() -> Client {
        create_client(ClientType::Standard, Duration::from_secs(5)).unwrap()
    }

    fn request() -> NarrativeRequest {
        NarrativeRequest::new("compare these".to_string())
    }

    #[tokio::test]
    async fn chat_completions_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "max_tokens": 2048
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"{\"executiveSummary\":\"ok\"}"}}]}"#)
            .create_async()
            .await;

        let generator = ChatCompletionsGenerator::new(
            http(),
            &server.url(),
            Some("test-key".into()),
            GROQ_DEFAULT_MODEL,
        );
        let text = generator.generate(&request()).await.unwrap();
        assert_eq!(text, r#"{"executiveSummary":"ok"}"#);
    }

    #[tokio::test]
    async fn chat_completions_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let generator =
            ChatCompletionsGenerator::new(http(), &server.url(), Some("k".into()), "m");
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("429"));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let generator = ChatCompletionsGenerator::new(http(), "http://127.0.0.1:9", None, "m");
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(err.to_string().starts_with("API_KEY_MISSING"));
    }

    #[tokio::test]
    async fn gemini_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock(
                "POST",
                Matcher::Regex(r"^/models/gemini-2\.0-flash:generateContent".into()),
            )
            .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#)
            .create_async()
            .await;

        let generator = GeminiGenerator::new(
            http(),
            &server.url(),
            Some("g-key".into()),
            GEMINI_DEFAULT_MODEL,
        );
        assert_eq!(generator.generate(&request()).await.unwrap(), "hello");
    }
}
