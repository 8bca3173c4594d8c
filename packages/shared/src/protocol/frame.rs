//! Frame definitions.

use serde::{Deserialize, Serialize};

use super::decode::ProtocolError;

/// Correlates a request with its response.
pub type RequestId = u64;

/// A frame type whose `type` tags are known ahead of decoding.
pub trait TaggedFrame {
    /// Every `type` tag the enum accepts.
    const TAGS: &'static [&'static str];

    /// Field-level checks that serde cannot express.
    fn validate(&self) -> Result<(), ProtocolError> {
        Ok(())
    }
}

/// Chat message as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_nickname: Option<String>,
    pub is_system_message: bool,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_icon: Option<String>,
}

impl MessagePayload {
    fn validate(&self) -> Result<(), ProtocolError> {
        if self.timestamp < 0 {
            return Err(ProtocolError::MalformedPayload(format!(
                "negative message timestamp: {}",
                self.timestamp
            )));
        }
        Ok(())
    }
}

/// Per-user settings inside a `userList` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_icon: Option<String>,
}

/// One entry of a `userList` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<UserSettings>,
}

/// Frames sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    #[serde(rename_all = "camelCase")]
    CreateChatRoom {
        request_id: RequestId,
        nickname: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_icon: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    JoinChatRoom {
        request_id: RequestId,
        nickname: String,
        room_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_icon: Option<String>,
    },
    /// Chat message. `request_id` is present only when the sender wants an `ack`.
    #[serde(rename_all = "camelCase")]
    SendMessage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        room_id: String,
        body: String,
        is_system_message: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_icon: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SetTypingPresence { room_id: String },
}

impl TaggedFrame for ClientFrame {
    const TAGS: &'static [&'static str] = &[
        "createChatRoom",
        "joinChatRoom",
        "sendMessage",
        "setTypingPresence",
    ];
}

/// Frames sent from the server to the client.
///
/// `userId`, `userList`, `sendMessage` and `setTypingPresence` are
/// notifications; the rest answer a request by its `requestId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    #[serde(rename_all = "camelCase")]
    UserId { user_id: String },
    #[serde(rename_all = "camelCase")]
    UserList { users: Vec<UserPayload> },
    SendMessage(MessagePayload),
    #[serde(rename_all = "camelCase")]
    SetTypingPresence {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        request_id: RequestId,
        room_id: String,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        request_id: RequestId,
        room_id: String,
        messages: Vec<MessagePayload>,
    },
    #[serde(rename_all = "camelCase")]
    Ack { request_id: RequestId },
    #[serde(rename_all = "camelCase")]
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        message: String,
    },
}

impl TaggedFrame for ServerFrame {
    const TAGS: &'static [&'static str] = &[
        "userId",
        "userList",
        "sendMessage",
        "setTypingPresence",
        "roomCreated",
        "roomJoined",
        "ack",
        "error",
    ];

    fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            ServerFrame::UserId { user_id } if user_id.is_empty() => Err(
                ProtocolError::MalformedPayload("empty user id".to_string()),
            ),
            ServerFrame::RoomCreated { room_id, .. } if room_id.is_empty() => Err(
                ProtocolError::MalformedPayload("empty room id".to_string()),
            ),
            ServerFrame::RoomJoined {
                room_id, messages, ..
            } => {
                if room_id.is_empty() {
                    return Err(ProtocolError::MalformedPayload(
                        "empty room id".to_string(),
                    ));
                }
                messages.iter().try_for_each(MessagePayload::validate)
            }
            ServerFrame::SendMessage(payload) => payload.validate(),
            _ => Ok(()),
        }
    }
}
