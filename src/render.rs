use crate::types::Message;
use anyhow::Result;
use chrono::Local;

pub const TYPING_INDICATOR: &str = "agent is typing...";

/// Terminal rendering of one chat bubble. Markup in `content` is printed as-is.
pub fn render_message(message: &Message, show_data: bool) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let mut out = format!("[{time}] {}:\n{}\n", message.role.label(), message.content);

    if show_data {
        if let Some(data) = &message.data {
            let panel = serde_json::to_string_pretty(data).unwrap_or_default();
            for line in panel.lines() {
                out.push_str("  | ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

pub fn pretty_message(message: &Message) -> Result<String> {
    let json = serde_json::to_string_pretty(message)?;
    Ok(json)
}
