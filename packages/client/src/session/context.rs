//! Explicitly owned session context.

use crate::config::SessionConfig;

use super::event::{RoomId, UserId};

/// Who this session is and where it is.
///
/// Owned by the [`SessionClient`](super::SessionClient); callers get snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Nickname of the last successful join (initially the configured one)
    pub nickname: String,
    pub icon: Option<String>,
    /// Assigned by the server through a `userId` notification
    pub user_id: Option<UserId>,
    /// The single room this session is a member of
    pub current_room: Option<RoomId>,
    /// Rooms created by this session, oldest first, without duplicates
    pub created_rooms: Vec<RoomId>,
}

impl SessionContext {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            nickname: config.nickname.clone(),
            icon: config.icon.clone(),
            ..Self::default()
        }
    }

    pub fn record_created_room(&mut self, room_id: RoomId) {
        if !self.created_rooms.contains(&room_id) {
            self.created_rooms.push(room_id);
        }
    }

    /// Switch membership to `room_id`, replacing any previous room.
    pub fn enter_room(&mut self, room_id: RoomId, nickname: &str) {
        self.current_room = Some(room_id);
        self.nickname = nickname.to_string();
    }

    pub fn is_in_room(&self, room_id: &RoomId) -> bool {
        self.current_room.as_ref() == Some(room_id)
    }
}
