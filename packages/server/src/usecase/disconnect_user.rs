//! UseCase: ユーザー切断処理

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRepository, UserId};

use super::presence;

/// ユーザー切断のユースケース
///
/// MessagePusher から登録を解除し、参加中のルームがあれば退出させて
/// 残った参加者に参加者リストを送ります。
pub struct DisconnectUserUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUserUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self, user_id: &UserId, current_room: Option<&RoomId>) {
        self.message_pusher.unregister_client(user_id).await;

        let Some(room_id) = current_room else {
            return;
        };
        match self.repository.remove_member(room_id, user_id).await {
            Ok(_) => {
                tracing::info!("User '{}' left room '{}'", user_id, room_id);
                presence::broadcast_user_list(
                    self.repository.as_ref(),
                    self.message_pusher.as_ref(),
                    room_id,
                )
                .await;
            }
            Err(e) => tracing::warn!("Failed to remove '{}' from '{}': {}", user_id, room_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Member, MockMessagePusher, Nickname, Room, Timestamp},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test]
    async fn test_disconnect_leaves_room_and_notifies_others() {
        // テスト項目: 切断したユーザーはルームから外れ、残りの参加者に参加者リストが送られる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = RoomId::new("room-42".to_string()).unwrap();
        repository
            .create_room(Room::new(room_id.clone(), Timestamp::new(0)))
            .await
            .unwrap();
        let alice = UserId::generate();
        let bob = UserId::generate();
        for (user, nickname) in [(&alice, "alice"), (&bob, "bob")] {
            repository
                .add_member(
                    &room_id,
                    Member::new(
                        user.clone(),
                        Nickname::new(nickname.to_string()).unwrap(),
                        None,
                        Timestamp::new(0),
                    ),
                )
                .await
                .unwrap();
        }
        let mut pusher = MockMessagePusher::new();
        pusher.expect_unregister_client().times(1).returning(|_| ());
        let bob_for_check = bob.clone();
        pusher
            .expect_broadcast()
            .withf(move |targets, _| targets == &vec![bob_for_check.clone()])
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = DisconnectUserUseCase::new(repository.clone(), Arc::new(pusher));

        // when (操作):
        usecase.execute(&alice, Some(&room_id)).await;

        // then (期待する結果):
        let members = repository.get_members(&room_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, bob);
    }

    #[tokio::test]
    async fn test_disconnect_without_room() {
        // テスト項目: ルームに参加していないユーザーの切断は登録解除のみ行う
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let mut pusher = MockMessagePusher::new();
        pusher.expect_unregister_client().times(1).returning(|_| ());
        let usecase = DisconnectUserUseCase::new(repository, Arc::new(pusher));

        // when (操作):
        usecase.execute(&UserId::generate(), None).await;

        // then (期待する結果): broadcast は呼ばれない（MockMessagePusher が検証）
    }
}
