// src/ai/mod.rs

//! Remote conversational assistant.
//!
//! The [`Assistant`] trait is the seam to the external service; [`ask`]
//! drives one question/answer round trip (post message, start run, poll the
//! run until it settles, read the newest reply) under a single wall-clock
//! budget. None of this touches the [`Store`](crate::store::Store) lock.

pub mod openai;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use openai::OpenAiClient;

/// Delay between two run status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")]
    Request(String),

    #[error("assistant http error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("assistant response parse error: {0}")]
    Decode(String),

    #[error("assistant run ended with status {0:?}")]
    RunEnded(RunStatus),

    #[error("assistant did not answer within {0:?}")]
    Timeout(Duration),

    #[error("assistant returned no reply")]
    EmptyReply,
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AssistantError::Decode(err.to_string())
        } else {
            AssistantError::Request(err.to_string())
        }
    }
}

/// Lifecycle of an assistant run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Cancelling,
    Completed,
    Failed,
    Cancelled,
    Expired,
    /// Anything this client does not drive to completion (e.g. `requires_action`).
    #[serde(other)]
    Other,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Other
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// One text message of a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub role: MessageRole,
    pub text: String,
}

/// External conversation service. Every call is fallible and subject to the
/// caller's timeout.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Opens a new conversation and returns its thread id.
    async fn create_thread(&self) -> Result<String, AssistantError>;

    async fn post_message(&self, thread_id: &str, text: &str) -> Result<(), AssistantError>;

    /// Starts a run on the thread and returns the run id.
    async fn start_run(&self, thread_id: &str) -> Result<String, AssistantError>;

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus, AssistantError>;

    /// Newest messages first.
    async fn latest_messages(
        &self,
        thread_id: &str,
        limit: usize,
    ) -> Result<Vec<ThreadMessage>, AssistantError>;
}

/// Sends `text` on `thread_id` and waits for the assistant's reply.
///
/// The whole exchange, including polling, must finish within `budget`.
pub async fn ask(
    assistant: &dyn Assistant,
    thread_id: &str,
    text: &str,
    budget: Duration,
    poll_interval: Duration,
) -> Result<String, AssistantError> {
    tokio::time::timeout(budget, exchange(assistant, thread_id, text, poll_interval))
        .await
        .map_err(|_| AssistantError::Timeout(budget))?
}

async fn exchange(
    assistant: &dyn Assistant,
    thread_id: &str,
    text: &str,
    poll_interval: Duration,
) -> Result<String, AssistantError> {
    assistant.post_message(thread_id, text).await?;
    let run_id = assistant.start_run(thread_id).await?;

    let status = loop {
        let status = assistant.run_status(thread_id, &run_id).await?;
        if status.is_terminal() {
            break status;
        }
        tracing::debug!(thread_id, run_id = %run_id, ?status, "assistant run pending");
        tokio::time::sleep(poll_interval).await;
    };

    if status != RunStatus::Completed {
        return Err(AssistantError::RunEnded(status));
    }

    assistant
        .latest_messages(thread_id, 10)
        .await?
        .into_iter()
        .find(|m| m.role == MessageRole::Assistant && !m.text.trim().is_empty())
        .map(|m| m.text)
        .ok_or(AssistantError::EmptyReply)
}
