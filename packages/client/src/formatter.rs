//! Message formatting utilities for client display.

use hiroba_shared::time::format_time_of_day;

use crate::session::{ChatMessage, RoomId, User};

const ANONYMOUS: &str = "anonymous";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message
    ///
    /// User messages render as `[HH:MM] nickname: body`; system messages as
    /// `[HH:MM] * body`. The time of day is taken from the message timestamp.
    pub fn format_message(message: &ChatMessage) -> String {
        let time = format_time_of_day(message.timestamp);
        if message.is_system {
            format!("[{}] * {}", time, message.body)
        } else {
            let nickname = message.nickname.as_deref().unwrap_or(ANONYMOUS);
            format!("[{}] {}: {}", time, nickname, message.body)
        }
    }

    /// Format the presence list of the joined room
    ///
    /// # Arguments
    ///
    /// * `users` - Members of the room
    /// * `current_nickname` - This session's nickname (to mark as "me")
    pub fn format_user_list(users: &[User], current_nickname: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Users:\n");

        if users.is_empty() {
            output.push_str("(No users)\n");
        } else {
            for user in users {
                let nickname = user.nickname.as_deref().unwrap_or(ANONYMOUS);
                let me_suffix = if nickname == current_nickname {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("{}{}\n", nickname, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format the room list, marking the selected room with `*`
    pub fn format_room_list(rooms: &[RoomId], selected: Option<&RoomId>) -> String {
        if rooms.is_empty() {
            return "(No rooms yet: /create or /join <room-id>)\n".to_string();
        }

        rooms
            .iter()
            .map(|room_id| {
                let marker = if Some(room_id) == selected { "*" } else { " " };
                format!("{} {}\n", marker, room_id)
            })
            .collect()
    }

    /// Format the notice shown after joining a room
    pub fn format_room_joined(room_id: &RoomId, prior_count: usize) -> String {
        format!(
            "\n------------------------------------------------------------\n\
             Joined room {} ({} earlier messages)\n\
             ------------------------------------------------------------\n",
            room_id, prior_count
        )
    }

    /// Format the typing indicator
    pub fn format_typing_indicator() -> String {
        "... someone is typing".to_string()
    }
}
