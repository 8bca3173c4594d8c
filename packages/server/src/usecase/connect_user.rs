//! UseCase: ユーザー接続処理

use std::sync::Arc;

use hiroba_shared::protocol::{ServerFrame, encode_frame};

use crate::domain::{MessagePusher, PusherChannel, UserId};

/// ユーザー接続のユースケース
///
/// 接続ごとに新しい UserId を割り当て、`userId` フレームで本人に通知します。
pub struct ConnectUserUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectUserUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self, sender: PusherChannel) -> UserId {
        let user_id = UserId::generate();
        self.message_pusher
            .register_client(user_id.clone(), sender)
            .await;

        let frame = ServerFrame::UserId {
            user_id: user_id.as_str().to_string(),
        };
        match encode_frame(&frame) {
            Ok(json) => {
                if let Err(e) = self.message_pusher.push_to(&user_id, &json).await {
                    tracing::warn!("Failed to send user id to '{}': {}", user_id, e);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }

        user_id
    }
}
