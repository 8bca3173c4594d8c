//! UseCase: 入力中シグナルの中継

use std::sync::Arc;

use hiroba_shared::protocol::ServerFrame;

use crate::domain::{MessagePusher, RoomId, RoomRepository, UserId};

use super::{error::TypingError, presence};

/// 入力中シグナルを同じルームの他の参加者に中継するユースケース
pub struct TypingUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl TypingUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 中継先のユーザーを返す
    pub async fn execute(
        &self,
        user_id: &UserId,
        current_room: Option<&RoomId>,
        room_id: &str,
    ) -> Result<Vec<UserId>, TypingError> {
        let room_id = current_room
            .filter(|current| current.as_str() == room_id)
            .ok_or_else(|| TypingError::NotInRoom(room_id.to_string()))?;

        let members = self
            .repository
            .get_members(room_id)
            .await
            .map_err(|_| TypingError::NotInRoom(room_id.as_str().to_string()))?;
        let targets: Vec<UserId> = presence::member_ids(&members)
            .into_iter()
            .filter(|id| id != user_id)
            .collect();

        let frame = ServerFrame::SetTypingPresence {
            room_id: Some(room_id.as_str().to_string()),
            user_id: Some(user_id.as_str().to_string()),
        };
        presence::broadcast_frame(self.message_pusher.as_ref(), targets.clone(), &frame).await;

        Ok(targets)
    }
}
