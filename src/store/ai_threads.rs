// src/store/ai_threads.rs

use chrono::Utc;

use super::{Inner, Store, StoreError, StoreResult};
use crate::models::ai_thread::{AIThread, QuestionPosition, ThreadStatus};

impl Inner {
    /// Slot of the attempt that may take a new assistant thread.
    fn open_slot(&self, attempt_id: u64, question_position: u64) -> StoreResult<QuestionPosition> {
        let attempt = self
            .attempts
            .get(&attempt_id)
            .ok_or(StoreError::NotFound("attempt"))?;

        let len = attempt.answers.len();
        let position = QuestionPosition::new(question_position)
            .filter(|p| p.get() <= len as u64)
            .ok_or(StoreError::OutOfRange {
                position: question_position,
                len,
            })?;

        if !position.allows_rebind() && self.ai_threads.contains_key(&(attempt_id, position.get())) {
            return Err(StoreError::Conflict(
                "thread already exists for this question".to_string(),
            ));
        }

        Ok(position)
    }
}

impl Store {
    /// Checks that the question slot would accept a binding, without binding.
    ///
    /// Lets callers skip creating a remote thread that would be rejected.
    /// `create_ai_thread` repeats the check under the write lock.
    pub fn check_ai_slot(&self, attempt_id: u64, question_position: u64) -> StoreResult<()> {
        self.read().open_slot(attempt_id, question_position).map(|_| ())
    }

    /// Binds an external assistant thread to a question slot of the attempt.
    ///
    /// Position 1 may be rebound, replacing the previous thread. Any other
    /// position accepts a single binding.
    pub fn create_ai_thread(
        &self,
        attempt_id: u64,
        question_position: u64,
        thread_id: &str,
    ) -> StoreResult<AIThread> {
        let mut inner = self.write();
        let position = inner.open_slot(attempt_id, question_position)?;

        let thread = AIThread {
            attempt_id,
            question_position: position.get(),
            thread_id: thread_id.to_string(),
            status: ThreadStatus::Active,
            created_at: Utc::now(),
        };
        inner
            .ai_threads
            .insert((attempt_id, position.get()), thread.clone());

        Ok(thread)
    }

    /// Current binding of the question slot, if any.
    pub fn ai_thread(&self, attempt_id: u64, question_position: u64) -> Option<AIThread> {
        self.read()
            .ai_threads
            .get(&(attempt_id, question_position))
            .cloned()
    }
}
