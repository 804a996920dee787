// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle of an attempt. The only transition is `Started -> Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Started,
    Submitted,
}

/// One answer slot of an attempt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    /// Same as `question_id`.
    pub id: u64,
    pub question_id: u64,
    pub text: String,
    pub right_or_not: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Answer {
    pub fn placeholder(question_id: u64) -> Self {
        Self {
            id: question_id,
            question_id,
            text: String::new(),
            right_or_not: false,
            created_at: None,
        }
    }
}

/// A user's timed run through a random subset of a test's questions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Attempt {
    pub id: u64,
    pub user_id: u64,
    pub test_id: u64,
    pub status: AttemptStatus,

    /// Fixed length, one slot per selected question. Position `n` is `answers[n - 1]`.
    pub answers: Vec<Answer>,

    /// Running score.
    pub result: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Attempt {
    pub fn is_submitted(&self) -> bool {
        self.status == AttemptStatus::Submitted
    }
}

/// DTO for starting an attempt.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartAttemptRequest {
    #[validate(regex(
        path = *crate::models::access_code::ACCESS_CODE_PATTERN,
        message = "Malformed access code."
    ))]
    pub access_code: String,
}

/// DTO for answering a question.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PostAnswerRequest {
    #[validate(length(max = 10000))]
    pub text: String,
}
