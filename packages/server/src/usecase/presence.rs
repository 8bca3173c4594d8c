//! ルーム参加者への通知

use hiroba_shared::protocol::{ServerFrame, encode_frame};

use crate::{
    domain::{Member, MessagePusher, RoomId, RoomRepository, UserId},
    infrastructure::dto::conversion::user_list_frame,
};

/// フレームを複数のユーザーに送信
///
/// 送信の失敗はログに残すだけで呼び出し元には返しません。
pub(crate) async fn broadcast_frame(
    pusher: &dyn MessagePusher,
    targets: Vec<UserId>,
    frame: &ServerFrame,
) {
    let json = match encode_frame(frame) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };
    if let Err(e) = pusher.broadcast(targets, &json).await {
        tracing::warn!("Failed to broadcast frame: {}", e);
    }
}

pub(crate) fn member_ids(members: &[Member]) -> Vec<UserId> {
    members.iter().map(|m| m.id.clone()).collect()
}

/// ルームの現在の参加者リストを、そのルームの全参加者に送信
pub(crate) async fn broadcast_user_list(
    repository: &dyn RoomRepository,
    pusher: &dyn MessagePusher,
    room_id: &RoomId,
) {
    match repository.get_members(room_id).await {
        Ok(members) => {
            broadcast_frame(pusher, member_ids(&members), &user_list_frame(&members)).await;
        }
        Err(e) => tracing::warn!("Failed to load members of room '{}': {}", room_id, e),
    }
}
