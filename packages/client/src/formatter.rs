//! Message formatting utilities for client display.

use coderoom_shared::time::timestamp_to_local_clock;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room membership, marking the current participant
    ///
    /// # Arguments
    ///
    /// * `room` - The room the list belongs to
    /// * `members` - Participant names (sorted)
    /// * `me` - The current participant's name (to mark as "you")
    pub fn format_members(room: &str, members: &[String], me: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Participants in '{}':\n", room));

        if members.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for member in members {
                let suffix = if member == me { " (you)" } else { "" };
                output.push_str(&format!("  {}{}\n", member, suffix));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format the shared document after a remote update
    pub fn format_document(code: &str, received_at: i64) -> String {
        let body = if code.is_empty() { "(empty)\n" } else { code };
        let newline = if body.ends_with('\n') { "" } else { "\n" };
        format!(
            "\n\n{rule}\ndocument updated at {}\n{rule}\n{}{}{rule}\n",
            timestamp_to_local_clock(received_at),
            body,
            newline,
            rule = RULE
        )
    }

    pub fn format_language(language: &str) -> String {
        format!("\n* language set to {}\n", language)
    }

    /// Format a typing indicator; `None` when nothing should be shown
    /// (indicator cleared, or our own pulse echoed back)
    pub fn format_typing(name: &str, me: &str) -> Option<String> {
        if name.is_empty() || name == me {
            return None;
        }
        Some(format!("\n... {} is typing\n", name))
    }

    /// Format a raw text frame that could not be decoded
    pub fn format_raw_message(text: &str) -> String {
        format!("\n[raw] {}\n", text)
    }
}
