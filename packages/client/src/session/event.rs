//! Typed notifications delivered to the session's caller.

use std::fmt;

use hiroba_shared::protocol::{MessagePayload, UserPayload};

/// Opaque room identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Wrap a raw room id. Returns `None` for blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque user identifier assigned by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A member of the joined room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<UserId>,
    pub nickname: Option<String>,
    pub icon: Option<String>,
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        let settings = payload.user_settings.unwrap_or_default();
        Self {
            id: payload.user_id.map(UserId::new),
            nickname: settings.user_nickname,
            icon: settings.user_icon,
        }
    }
}

/// A chat message as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Room the message belongs to, when the server tags it
    pub room_id: Option<RoomId>,
    pub body: String,
    pub nickname: Option<String>,
    pub is_system: bool,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    pub icon: Option<String>,
}

impl From<MessagePayload> for ChatMessage {
    fn from(payload: MessagePayload) -> Self {
        Self {
            room_id: payload.room_id.and_then(RoomId::new),
            body: payload.body,
            nickname: payload.user_nickname,
            is_system: payload.is_system_message,
            timestamp: payload.timestamp,
            icon: payload.user_icon,
        }
    }
}

/// Successful answer to a join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    pub room_id: RoomId,
    /// Messages recorded in the room before this session joined, oldest first
    pub prior_messages: Vec<ChatMessage>,
}

/// Notification delivered through the session's event channel, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The connection is established and requests are accepted
    Ready,
    /// The transport closed or the connection attempt failed
    Closed { reason: Option<String> },
    /// The server assigned this session a user id
    UserIdAssigned(UserId),
    /// Full presence list of the joined room
    UserListUpdated(Vec<User>),
    MessageReceived(ChatMessage),
    TypingSignalReceived {
        room_id: Option<RoomId>,
        user_id: Option<UserId>,
    },
}
