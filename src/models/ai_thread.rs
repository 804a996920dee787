// src/models/ai_thread.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 1-indexed question slot of an attempt.
///
/// The first slot may be rebound to a fresh assistant thread; every later
/// slot accepts a single binding only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionPosition {
    First,
    Subsequent(u64),
}

impl QuestionPosition {
    /// Returns `None` for position zero.
    pub fn new(position: u64) -> Option<Self> {
        match position {
            0 => None,
            1 => Some(Self::First),
            n => Some(Self::Subsequent(n)),
        }
    }

    pub fn get(self) -> u64 {
        match self {
            Self::First => 1,
            Self::Subsequent(n) => n,
        }
    }

    pub fn allows_rebind(self) -> bool {
        matches!(self, Self::First)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    Active,
}

/// Binding between an attempt's question slot and an external assistant thread.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AIThread {
    pub attempt_id: u64,
    pub question_position: u64,
    pub thread_id: String,
    pub status: ThreadStatus,
    pub created_at: DateTime<Utc>,
}

/// DTO for sending a message to the assistant.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

/// Assistant answer returned to the client.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssistantReply {
    pub thread_id: String,
    pub reply: String,
}
