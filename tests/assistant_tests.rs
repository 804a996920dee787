// tests/assistant_tests.rs

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use quiz_backend::ai::{
    Assistant, AssistantError, MessageRole, RunStatus, ThreadMessage, ask,
};

/// Assistant replaying a fixed sequence of run statuses.
struct ScriptedAssistant {
    statuses: Mutex<Vec<RunStatus>>,
    posted: Mutex<Vec<String>>,
    messages: Vec<ThreadMessage>,
}

impl ScriptedAssistant {
    fn new(statuses: &[RunStatus], messages: Vec<ThreadMessage>) -> Self {
        let mut statuses = statuses.to_vec();
        statuses.reverse();
        Self {
            statuses: Mutex::new(statuses),
            posted: Mutex::new(Vec::new()),
            messages,
        }
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn create_thread(&self) -> Result<String, AssistantError> {
        Ok("thread_1".to_string())
    }

    async fn post_message(&self, _thread_id: &str, text: &str) -> Result<(), AssistantError> {
        self.posted.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn start_run(&self, _thread_id: &str) -> Result<String, AssistantError> {
        Ok("run_1".to_string())
    }

    async fn run_status(&self, _thread_id: &str, _run_id: &str) -> Result<RunStatus, AssistantError> {
        // Last scripted status repeats forever.
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.pop().unwrap())
        } else {
            Ok(statuses[0])
        }
    }

    async fn latest_messages(
        &self,
        _thread_id: &str,
        limit: usize,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        Ok(self.messages.iter().take(limit).cloned().collect())
    }
}

fn assistant_says(text: &str) -> ThreadMessage {
    ThreadMessage {
        role: MessageRole::Assistant,
        text: text.to_string(),
    }
}

fn user_says(text: &str) -> ThreadMessage {
    ThreadMessage {
        role: MessageRole::User,
        text: text.to_string(),
    }
}

const BUDGET: Duration = Duration::from_secs(2);
const POLL: Duration = Duration::from_millis(1);

#[tokio::test]
async fn polls_until_completed_and_returns_newest_reply() {
    let assistant = ScriptedAssistant::new(
        &[RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed],
        vec![
            user_says("hint please"),
            assistant_says("newest"),
            assistant_says("older"),
        ],
    );

    let reply = ask(&assistant, "thread_1", "hint please", BUDGET, POLL)
        .await
        .unwrap();

    assert_eq!(reply, "newest");
    assert_eq!(*assistant.posted.lock().unwrap(), vec!["hint please"]);
}

#[tokio::test]
async fn failed_run_is_reported() {
    let assistant = ScriptedAssistant::new(
        &[RunStatus::InProgress, RunStatus::Failed],
        vec![assistant_says("stale")],
    );

    let err = ask(&assistant, "thread_1", "hi", BUDGET, POLL).await.unwrap_err();
    assert!(matches!(err, AssistantError::RunEnded(RunStatus::Failed)));
}

#[tokio::test]
async fn cancelling_is_not_terminal() {
    let assistant = ScriptedAssistant::new(
        &[RunStatus::Cancelling, RunStatus::Cancelled],
        vec![],
    );

    let err = ask(&assistant, "thread_1", "hi", BUDGET, POLL).await.unwrap_err();
    assert!(matches!(err, AssistantError::RunEnded(RunStatus::Cancelled)));
}

#[tokio::test]
async fn completed_without_reply_is_an_error() {
    let assistant = ScriptedAssistant::new(&[RunStatus::Completed], vec![user_says("hi")]);

    let err = ask(&assistant, "thread_1", "hi", BUDGET, POLL).await.unwrap_err();
    assert!(matches!(err, AssistantError::EmptyReply));
}

#[tokio::test]
async fn stuck_run_times_out() {
    let assistant = ScriptedAssistant::new(&[RunStatus::Queued], vec![]);
    let budget = Duration::from_millis(50);

    let err = ask(&assistant, "thread_1", "hi", budget, Duration::from_millis(5))
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::Timeout(d) if d == budget));
}
