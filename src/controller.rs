use crate::message_log::MessageLog;
use crate::resolver;
use crate::types::{ChatSnapshot, Role};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Artificial "thinking" time before the assistant reply lands.
pub const RESPONSE_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Empty,
    Pending,
}

struct SessionState {
    log: MessageLog,
    pending: bool,
}

struct Shared {
    state: Mutex<SessionState>,
    snapshots: watch::Sender<ChatSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        self.snapshots.send_replace(ChatSnapshot {
            messages: state.log.messages().to_vec(),
            pending: state.pending,
        });
    }
}

/// Drives user/assistant exchanges for one chat session.
///
/// Must be used from within a tokio runtime: accepted submissions schedule
/// the delayed reply as a task. Dropping the controller aborts that task.
pub struct TurnController {
    shared: Arc<Shared>,
    reply_task: Mutex<Option<JoinHandle<()>>>,
}

impl TurnController {
    pub fn new() -> Self {
        let log = MessageLog::new();
        let (snapshots, _) = watch::channel(ChatSnapshot {
            messages: log.messages().to_vec(),
            pending: false,
        });
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState {
                    log,
                    pending: false,
                }),
                snapshots,
            }),
            reply_task: Mutex::new(None),
        }
    }

    pub fn submit(&self, text: &str) -> Submission {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring empty submission");
            return Submission::Ignored(IgnoreReason::Empty);
        }

        {
            let mut state = self.shared.lock();
            if state.pending {
                debug!("ignoring submission while a reply is pending");
                return Submission::Ignored(IgnoreReason::Pending);
            }
            let id = state.log.append(Role::User, text, None).id;
            state.pending = true;
            self.shared.publish(&state);
            info!(message_id = id, "user turn accepted");
        }

        let deadline = Instant::now() + RESPONSE_DELAY;
        let shared = Arc::clone(&self.shared);
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let topic = resolver::resolve(&text);
            let record = topic.record();

            let mut state = shared.lock();
            let id = state
                .log
                .append(Role::Assistant, record.content, record.payload())
                .id;
            state.pending = false;
            shared.publish(&state);
            info!(message_id = id, ?topic, "assistant turn delivered");
        });

        *self
            .reply_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Submission::Accepted
    }

    /// A reply that is already scheduled still lands after the greeting.
    pub fn clear(&self) {
        let mut state = self.shared.lock();
        state.log.clear();
        self.shared.publish(&state);
        info!("conversation cleared");
    }

    pub fn is_pending(&self) -> bool {
        self.shared.lock().pending
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.shared.snapshots.subscribe()
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TurnController {
    fn drop(&mut self) {
        let task = self
            .reply_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_log::CLEARED_MESSAGE;
    use crate::resolver::Topic;

    async fn wait_for_reply(rx: &mut watch::Receiver<ChatSnapshot>) -> ChatSnapshot {
        rx.wait_for(|snapshot| !snapshot.pending)
            .await
            .expect("controller alive")
            .clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_appends_user_then_assistant() {
        let controller = TurnController::new();
        let mut rx = controller.subscribe();

        let outcome = controller.submit("  Which vendor has the highest duplicate claims?  ");
        assert_eq!(outcome, Submission::Accepted);

        let snapshot = controller.snapshot();
        assert!(snapshot.pending);
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[1].role, Role::User);
        assert_eq!(
            snapshot.messages[1].content,
            "Which vendor has the highest duplicate claims?"
        );

        let snapshot = wait_for_reply(&mut rx).await;
        assert_eq!(snapshot.messages.len(), 3);
        let reply = &snapshot.messages[2];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, Topic::VendorAnalysis.record().content);
        let data = reply.data.as_ref().expect("vendor data");
        assert_eq!(data["vendor"], "Vendor A");
        assert_eq!(data["duplicate_rate"], "18%");
        assert!(!controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_fixed_delay() {
        let controller = TurnController::new();
        controller.submit("hello");

        tokio::time::advance(RESPONSE_DELAY - Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert!(controller.is_pending());
        assert_eq!(controller.snapshot().messages.len(), 2);

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        let snapshot = controller.snapshot();
        assert!(!snapshot.pending);
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(snapshot.messages[2].content, Topic::Default.record().content);
        assert!(snapshot.messages[2].data.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submissions_are_ignored() {
        let controller = TurnController::new();
        let before = controller.snapshot();

        assert_eq!(
            controller.submit(""),
            Submission::Ignored(IgnoreReason::Empty)
        );
        assert_eq!(
            controller.submit("   \t"),
            Submission::Ignored(IgnoreReason::Empty)
        );

        assert_eq!(controller.snapshot(), before);
        assert!(!controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_pending_is_noop() {
        let controller = TurnController::new();
        let mut rx = controller.subscribe();

        assert_eq!(controller.submit("show the trend"), Submission::Accepted);
        assert_eq!(
            controller.submit("compare vendors"),
            Submission::Ignored(IgnoreReason::Pending)
        );
        assert_eq!(controller.snapshot().messages.len(), 2);

        let snapshot = wait_for_reply(&mut rx).await;
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(
            snapshot.messages[2].content,
            Topic::ClaimsTrend.record().content
        );

        // no second reply was scheduled
        tokio::time::sleep(RESPONSE_DELAY * 3).await;
        assert_eq!(controller.snapshot().messages.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turns_alternate_across_exchanges() {
        let controller = TurnController::new();
        let mut rx = controller.subscribe();

        for question in ["report please", "anything unusual?"] {
            assert_eq!(controller.submit(question), Submission::Accepted);
            wait_for_reply(&mut rx).await;
        }

        let roles: Vec<Role> = controller
            .snapshot()
            .messages
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(
            roles,
            [
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_to_single_greeting() {
        let controller = TurnController::new();
        let mut rx = controller.subscribe();
        controller.submit("status breakdown");
        wait_for_reply(&mut rx).await;

        controller.clear();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].role, Role::Assistant);
        assert_eq!(snapshot.messages[0].content, CLEARED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_reply_lands_after_clear() {
        let controller = TurnController::new();
        let mut rx = controller.subscribe();
        controller.submit("summary");
        controller.clear();
        assert!(controller.is_pending());

        let snapshot = wait_for_reply(&mut rx).await;
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].content, CLEARED_MESSAGE);
        assert_eq!(
            snapshot.messages[1].content,
            Topic::QuarterlyReport.record().content
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_scheduled_reply() {
        let controller = TurnController::new();
        let rx = controller.subscribe();
        controller.submit("hello");
        drop(controller);

        tokio::time::sleep(RESPONSE_DELAY * 2).await;
        let snapshot = rx.borrow().clone();
        assert!(snapshot.pending);
        assert_eq!(snapshot.messages.len(), 2);
    }
}
