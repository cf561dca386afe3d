// Assistants API client implementation (HTTP direct, no SDK)

use crate::traits::AssistantClient;
use crate::types::RunStatus;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

const ASSISTANT_API_BASE: &str = "https://api.openai.com/v1";

/// Client for the hosted assistant-run service
pub struct OpenAIAssistantClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIAssistantClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );
        // The threads/runs surface is versioned behind this header
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: ASSISTANT_API_BASE.to_string(),
        })
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Assistant API error ({}): {}", status, error_text);
        }

        response.json().await.context("Failed to parse response")
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Assistant API error ({}): {}", status, error_text);
        }

        response.json().await.context("Failed to parse response")
    }
}

#[async_trait]
impl AssistantClient for OpenAIAssistantClient {
    async fn create_thread(&self) -> Result<String> {
        let thread: ThreadObject = self.post_json("/threads", serde_json::json!({})).await?;
        Ok(thread.id)
    }

    async fn append_user_message(&self, thread_id: &str, text: &str) -> Result<()> {
        let _: MessageObject = self
            .post_json(
                &format!("/threads/{}/messages", thread_id),
                serde_json::json!({
                    "role": "user",
                    "content": text,
                }),
            )
            .await?;
        Ok(())
    }

    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<String> {
        let run: RunObject = self
            .post_json(
                &format!("/threads/{}/runs", thread_id),
                serde_json::json!({
                    "assistant_id": assistant_id,
                }),
            )
            .await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run.id, "Run created");
        Ok(run.id)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus> {
        let run: RunObject = self
            .get_json(&format!("/threads/{}/runs/{}", thread_id, run_id))
            .await?;
        Ok(run.status)
    }

    async fn latest_reply(&self, thread_id: &str) -> Result<Option<String>> {
        let list: MessageList = self
            .get_json(&format!("/threads/{}/messages?order=desc&limit=20", thread_id))
            .await?;

        // Newest first; the first assistant message is the reply to the run
        // that just completed.
        let reply = list
            .data
            .into_iter()
            .find(|message| message.role == "assistant")
            .and_then(|message| {
                message
                    .content
                    .into_iter()
                    .find_map(|part| part.text.map(|t| t.value))
            });

        Ok(reply)
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .http_client
            .get(format!("{}/models", self.base_url))
            .send()
            .await
            .context("Failed to reach assistant service")?;

        if !response.status().is_success() {
            anyhow::bail!("Assistant service returned {}", response.status());
        }
        Ok(())
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}
