//! UseCase: メッセージ送信
//!
//! メッセージは送信者を含むルームの参加者全員に配信されます。

use std::sync::Arc;

use hiroba_shared::{
    protocol::{MessagePayload, ServerFrame},
    time::Clock,
};

use crate::domain::{
    ChatMessage, MessageBody, MessagePusher, RoomId, RoomRepository, Timestamp, UserId,
};

use super::{error::SendMessageError, presence};

/// 配信したメッセージと配信先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message: ChatMessage,
    pub recipients: Vec<UserId>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// `room_id` は送信者が現在参加しているルームでなければなりません。
    pub async fn execute(
        &self,
        user_id: &UserId,
        current_room: Option<&RoomId>,
        room_id: &str,
        body: String,
        is_system: bool,
        icon: Option<String>,
    ) -> Result<SentMessage, SendMessageError> {
        let room_id = current_room
            .filter(|current| current.as_str() == room_id)
            .ok_or_else(|| SendMessageError::NotInRoom(room_id.to_string()))?;
        let body = MessageBody::new(body).map_err(SendMessageError::InvalidBody)?;

        let room = self
            .repository
            .get_room(room_id)
            .await
            .map_err(SendMessageError::Repository)?;
        let sender = room
            .member(user_id)
            .ok_or_else(|| SendMessageError::NotInRoom(room_id.as_str().to_string()))?;

        let message = ChatMessage {
            room_id: room_id.clone(),
            sender: (!is_system).then(|| sender.nickname.clone()),
            body,
            is_system,
            icon: icon.or_else(|| sender.icon.clone()),
            timestamp: Timestamp::new(self.clock.now_millis()),
        };

        self.repository
            .add_message(room_id, message.clone())
            .await
            .map_err(SendMessageError::Repository)?;

        let recipients = presence::member_ids(&room.members);
        let frame = ServerFrame::SendMessage(MessagePayload::from(&message));
        presence::broadcast_frame(self.message_pusher.as_ref(), recipients.clone(), &frame).await;

        Ok(SentMessage {
            message,
            recipients,
        })
    }
}
