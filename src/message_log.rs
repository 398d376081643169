use crate::types::{Message, Payload, Role};
use chrono::Utc;

pub const WELCOME_MESSAGE: &str = "👋 Welcome to the AI Analytics Agent!\n\nI can help you analyze your business data using natural language. Try asking questions about:\n\n• Vendor performance and duplicate claims\n• Trends and patterns in your data\n• Anomaly detection and alerts\n• Custom reports and insights\n\nWhat would you like to explore today?";

pub const CLEARED_MESSAGE: &str = "Chat cleared. How can I help you today?";

/// Append-only history; `clear` swaps it for one greeting. Ids never reset.
#[derive(Debug)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 0,
        };
        log.append(Role::Assistant, WELCOME_MESSAGE, None);
        log
    }

    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        data: Option<Payload>,
    ) -> &Message {
        let message = Message {
            id: self.next_id,
            role,
            content: content.into(),
            data,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.append(Role::Assistant, CLEARED_MESSAGE, None);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}
