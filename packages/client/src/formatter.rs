//! Event formatting for terminal display.

use chrono::{DateTime, Local};

use idobata_server::infrastructure::dto::websocket::{
    HistoryEvent, JoinedEvent, MessageEvent, RenamedEvent, UserListEvent,
};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat or system message
    pub fn format_message(event: &MessageEvent, my_id: Option<&str>) -> String {
        let time = format_time(&event.ts);
        if event.user == "_system" {
            return format!("\n[{}] * {}\n", time, event.text);
        }

        let is_own = match (&event.user_id, my_id) {
            (Some(user_id), Some(me)) => user_id == me,
            _ => false,
        };
        let who = if is_own {
            format!("{} (you)", event.user)
        } else {
            event.user.clone()
        };

        if event.private {
            let to = event.to_user.as_deref().unwrap_or("?");
            format!("\n[{}] (private) {} -> {}: {}\n", time, who, to, event.text)
        } else {
            format!("\n[{}] {}: {}\n", time, who, event.text)
        }
    }

    /// Format the roster
    pub fn format_user_list(event: &UserListEvent) -> String {
        if event.users.is_empty() {
            return "\n(nobody online)\n".to_string();
        }
        let names: Vec<&str> = event.users.iter().map(|u| u.user.as_str()).collect();
        format!("\nOnline: {}\n", names.join(", "))
    }

    /// Format the join acknowledgement
    pub fn format_joined(event: &JoinedEvent) -> String {
        format!("\nYou are '{}' (id {})\n", event.user, event.id)
    }

    /// Format the rename acknowledgement
    pub fn format_renamed(event: &RenamedEvent) -> String {
        format!("\nYou are now '{}' (was '{}')\n", event.user, event.old)
    }

    /// Format a history snapshot
    pub fn format_history(event: &HistoryEvent, my_id: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\n--- history: {} ({} messages) ---\n",
            event.channel,
            event.messages.len()
        ));
        for message in &event.messages {
            let line = Self::format_message(message, my_id);
            output.push_str(line.trim_matches('\n'));
            output.push('\n');
        }
        output.push_str("--- end of history ---\n");
        output
    }
}

/// Render an ISO 8601 timestamp as local wall-clock time
fn format_time(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        Err(_) => ts.to_string(),
    }
}
