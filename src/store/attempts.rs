// src/store/attempts.rs
//
// Attempt lifecycle: random question selection, grading, deadlines, history.

use chrono::Utc;
use rand::seq::SliceRandom;

use super::{Inner, Store, StoreError, StoreResult};
use crate::models::{
    attempt::{Answer, Attempt, AttemptStatus},
    test::{Question, Test},
};

/// Uniform random subset of `questions`, without replacement, in random order.
fn pick_questions(questions: &[Question], count: usize) -> Vec<&Question> {
    let mut pool: Vec<&Question> = questions.iter().collect();
    pool.shuffle(&mut rand::thread_rng());
    pool.truncate(count);
    pool
}

impl Inner {
    /// Shared by every attempt mutation so that the deadline is judged under
    /// the same guard as the write that follows.
    fn check_deadline(&self, attempt_id: u64) -> StoreResult<(&Attempt, &Test)> {
        let attempt = self
            .attempts
            .get(&attempt_id)
            .ok_or(StoreError::NotFound("attempt"))?;
        let test = self
            .tests
            .get(&attempt.test_id)
            .ok_or(StoreError::NotFound("test"))?;

        if let Some(deadline) = test.deadline_from(attempt.started_at) {
            if Utc::now() > deadline {
                return Err(StoreError::Expired("test attempt"));
            }
        }

        Ok((attempt, test))
    }
}

impl Store {
    /// Starts an attempt with a fresh random selection of the test's questions.
    pub fn create_attempt(&self, test_id: u64, user_id: u64) -> StoreResult<Attempt> {
        let mut inner = self.write();

        let test = inner
            .tests
            .get(&test_id)
            .ok_or(StoreError::NotFound("test"))?;

        let answers = pick_questions(&test.questions, test.selection_size())
            .into_iter()
            .map(|q| Answer::placeholder(q.id))
            .collect();

        let attempt = Attempt {
            id: inner.next_attempt_id,
            user_id,
            test_id,
            status: AttemptStatus::Started,
            answers,
            result: 0,
            started_at: Utc::now(),
            finished_at: None,
        };
        inner.next_attempt_id += 1;
        inner.attempts.insert(attempt.id, attempt.clone());

        Ok(attempt)
    }

    /// Fails with `Expired` once a timed attempt is past `started_at + time_limit`.
    pub fn check_deadline(&self, attempt_id: u64) -> StoreResult<()> {
        self.read().check_deadline(attempt_id).map(|_| ())
    }

    /// Records the answer at the 1-indexed `position` and grades it.
    ///
    /// Grading uses the question at the same position of the test's full
    /// question list. A correct answer adds that question's score; a later
    /// wrong answer on the same position does not take it back.
    pub fn create_answer(&self, attempt_id: u64, position: u64, text: &str) -> StoreResult<Answer> {
        let mut inner = self.write();

        let (attempt, test) = inner.check_deadline(attempt_id)?;
        if attempt.is_submitted() {
            return Err(StoreError::Conflict("attempt closed".to_string()));
        }

        let len = attempt.answers.len();
        let index = usize::try_from(position)
            .ok()
            .filter(|p| (1..=len).contains(p))
            .map(|p| p - 1)
            .ok_or(StoreError::OutOfRange { position, len })?;

        let question = test.questions.get(index).ok_or_else(|| {
            StoreError::Inconsistent(format!(
                "test {} has no question at position {position}",
                test.id
            ))
        })?;
        let correct = question.answer == text;
        let score = question.max_score;

        let attempt = inner
            .attempts
            .get_mut(&attempt_id)
            .ok_or(StoreError::NotFound("attempt"))?;
        if correct {
            attempt.result += score;
        }

        let answer = &mut attempt.answers[index];
        answer.right_or_not = correct;
        answer.text = text.to_string();
        answer.created_at = Some(Utc::now());

        Ok(answer.clone())
    }

    /// Closes the attempt. Only a started attempt within its deadline can be submitted.
    pub fn submit_attempt(&self, attempt_id: u64) -> StoreResult<Attempt> {
        let mut inner = self.write();

        let (attempt, _) = inner.check_deadline(attempt_id)?;
        if attempt.is_submitted() {
            return Err(StoreError::Conflict("attempt closed".to_string()));
        }

        let attempt = inner
            .attempts
            .get_mut(&attempt_id)
            .ok_or(StoreError::NotFound("attempt"))?;
        attempt.status = AttemptStatus::Submitted;
        attempt.finished_at = Some(Utc::now());

        Ok(attempt.clone())
    }

    /// Questions of the attempt, in answer-slot order.
    pub fn get_attempt_questions(&self, attempt_id: u64) -> StoreResult<Vec<Question>> {
        let inner = self.read();

        let attempt = inner
            .attempts
            .get(&attempt_id)
            .ok_or(StoreError::NotFound("attempt"))?;
        let test = inner
            .tests
            .get(&attempt.test_id)
            .ok_or(StoreError::NotFound("test"))?;

        attempt
            .answers
            .iter()
            .map(|answer| {
                test.question_by_id(answer.question_id).cloned().ok_or_else(|| {
                    StoreError::Inconsistent(format!(
                        "question {} not found in test {}",
                        answer.question_id, test.id
                    ))
                })
            })
            .collect()
    }

    pub fn get_attempt_by_id(&self, attempt_id: u64) -> Option<Attempt> {
        self.read().attempts.get(&attempt_id).cloned()
    }

    /// Submitted attempts of `user_id` at `test_id`, most recently finished first.
    pub fn get_user_attempt_history(&self, user_id: u64, test_id: u64) -> StoreResult<Vec<Attempt>> {
        let inner = self.read();

        if !inner.tests.contains_key(&test_id) {
            return Err(StoreError::NotFound("test"));
        }

        let mut history: Vec<Attempt> = inner
            .attempts
            .values()
            .filter(|a| a.user_id == user_id && a.test_id == test_id && a.is_submitted())
            .cloned()
            .collect();

        // Stable: equal timestamps keep insertion order.
        history.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));

        Ok(history)
    }
}
