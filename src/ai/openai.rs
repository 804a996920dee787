// src/ai/openai.rs

//! OpenAI Assistants (v2) REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use super::{Assistant, AssistantError, MessageRole, RunStatus, ThreadMessage};

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request timeout of the underlying HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    assistant_id: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct RunResponse {
    status: RunStatus,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Deserialize)]
struct MessageObject {
    role: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextContent>,
}

#[derive(Deserialize)]
struct TextContent {
    value: String,
}

impl MessageObject {
    fn into_thread_message(self) -> Option<ThreadMessage> {
        let role = match self.role.as_str() {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            _ => return None,
        };
        let text = self
            .content
            .into_iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.map(|t| t.value))
            .collect::<Vec<_>>()
            .join("\n");
        Some(ThreadMessage { role, text })
    }
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        assistant_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, AssistantError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| AssistantError::Request(format!("invalid api key header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("openai-beta", HeaderValue::from_static("assistants=v2"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            assistant_id: assistant_id.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Surfaces non-2xx responses with their body.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AssistantError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AssistantError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Assistant for OpenAiClient {
    async fn create_thread(&self) -> Result<String, AssistantError> {
        let response = self
            .http
            .post(self.url("/threads"))
            .json(&json!({}))
            .send()
            .await?;
        let thread: IdResponse = Self::check(response).await?.json().await?;
        Ok(thread.id)
    }

    async fn post_message(&self, thread_id: &str, text: &str) -> Result<(), AssistantError> {
        let response = self
            .http
            .post(self.url(&format!("/threads/{thread_id}/messages")))
            .json(&json!({ "role": "user", "content": text }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn start_run(&self, thread_id: &str) -> Result<String, AssistantError> {
        let response = self
            .http
            .post(self.url(&format!("/threads/{thread_id}/runs")))
            .json(&json!({ "assistant_id": self.assistant_id }))
            .send()
            .await?;
        let run: IdResponse = Self::check(response).await?.json().await?;
        Ok(run.id)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus, AssistantError> {
        let response = self
            .http
            .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}")))
            .send()
            .await?;
        let run: RunResponse = Self::check(response).await?.json().await?;
        Ok(run.status)
    }

    async fn latest_messages(
        &self,
        thread_id: &str,
        limit: usize,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        let response = self
            .http
            .get(self.url(&format!(
                "/threads/{thread_id}/messages?limit={limit}&order=desc"
            )))
            .send()
            .await?;
        let list: MessageList = Self::check(response).await?.json().await?;
        Ok(list
            .data
            .into_iter()
            .filter_map(MessageObject::into_thread_message)
            .collect())
    }
}
