//! UseCase: ルーム参加
//!
//! 別のルームに参加中であればそのルームから退出し、残った参加者に
//! 参加者リストを送り直します。参加先のルームへの参加者リストの送信は、
//! 参加者本人への `roomJoined` 応答の後で `broadcast_user_list` を呼んで行います。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, Member, MessagePusher, Nickname, RepositoryError, RoomError, RoomId,
    RoomRepository, Timestamp, UserId,
};

use super::{error::JoinRoomError, presence};

/// 参加結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    pub room_id: RoomId,
    /// 参加前に記録されていたメッセージ（古い順）
    pub messages: Vec<ChatMessage>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 参加するユーザー
    /// * `nickname` - 参加時のニックネーム
    /// * `icon` - 参加時のアイコン
    /// * `room_id` - 参加先のルーム ID（未検証の文字列）
    /// * `previous_room` - 現在参加中のルーム
    pub async fn execute(
        &self,
        user_id: &UserId,
        nickname: String,
        icon: Option<String>,
        room_id: String,
        previous_room: Option<&RoomId>,
    ) -> Result<JoinedRoom, JoinRoomError> {
        let nickname = Nickname::new(nickname).map_err(JoinRoomError::InvalidNickname)?;
        let room_id = RoomId::new(room_id).map_err(JoinRoomError::InvalidRoomId)?;

        // 参加前の履歴を取得（存在確認を兼ねる）
        let room = self
            .repository
            .get_room(&room_id)
            .await
            .map_err(|e| map_repository_error(e, &room_id))?;

        let member = Member::new(
            user_id.clone(),
            nickname,
            icon,
            Timestamp::new(self.clock.now_millis()),
        );
        self.repository
            .add_member(&room_id, member)
            .await
            .map_err(|e| map_repository_error(e, &room_id))?;

        if let Some(previous) = previous_room.filter(|previous| **previous != room_id) {
            self.leave(user_id, previous).await;
        }

        tracing::info!(
            "User '{}' joined room '{}' ({} prior messages)",
            user_id,
            room_id,
            room.messages.len()
        );

        Ok(JoinedRoom {
            room_id,
            messages: room.messages.into_iter().collect(),
        })
    }

    /// ルームの参加者全員に最新の参加者リストを送信
    pub async fn broadcast_user_list(&self, room_id: &RoomId) {
        presence::broadcast_user_list(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            room_id,
        )
        .await;
    }

    async fn leave(&self, user_id: &UserId, room_id: &RoomId) {
        match self.repository.remove_member(room_id, user_id).await {
            Ok(_) => {
                tracing::info!("User '{}' left room '{}'", user_id, room_id);
                self.broadcast_user_list(room_id).await;
            }
            Err(e) => tracing::warn!("Failed to leave room '{}': {}", room_id, e),
        }
    }
}

fn map_repository_error(error: RepositoryError, room_id: &RoomId) -> JoinRoomError {
    match error {
        RepositoryError::RoomNotFound(_) => {
            JoinRoomError::RoomNotFound(room_id.as_str().to_string())
        }
        RepositoryError::Room(RoomError::RoomFull(_)) => JoinRoomError::RoomFull,
        other => JoinRoomError::Repository(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageBody, MockMessagePusher, Room},
        infrastructure::repository::InMemoryRoomRepository,
    };
    use hiroba_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 参加前の履歴が返されること
    // - 別のルームから移動すると元のルームから退出すること
    // - 存在しないルーム・満員のルームへの参加がエラーになること
    // ========================================

    async fn create_room(repository: &InMemoryRoomRepository, id: &str, max_members: usize) -> RoomId {
        let room_id = RoomId::new(id.to_string()).unwrap();
        repository
            .create_room(Room::with_capacity(
                room_id.clone(),
                Timestamp::new(0),
                max_members,
                100,
            ))
            .await
            .unwrap();
        room_id
    }

    fn create_usecase(
        repository: Arc<InMemoryRoomRepository>,
        pusher: MockMessagePusher,
    ) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            repository,
            Arc::new(pusher),
            Arc::new(FixedClock::new(1700000000000)),
        )
    }

    #[tokio::test]
    async fn test_join_room_returns_prior_messages() {
        // テスト項目: 参加すると、参加前に記録されたメッセージが返される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = create_room(&repository, "room-42", 10).await;
        let message = ChatMessage {
            room_id: room_id.clone(),
            sender: Some(Nickname::new("bob".to_string()).unwrap()),
            body: MessageBody::new("hi".to_string()).unwrap(),
            is_system: false,
            icon: None,
            timestamp: Timestamp::new(1700000000000),
        };
        repository.add_message(&room_id, message.clone()).await.unwrap();
        let usecase = create_usecase(repository.clone(), MockMessagePusher::new());
        let alice = UserId::generate();

        // when (操作):
        let joined = usecase
            .execute(&alice, "alice".to_string(), None, "room-42".to_string(), None)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(joined.room_id, room_id);
        assert_eq!(joined.messages, vec![message]);
        let members = repository.get_members(&room_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].joined_at, Timestamp::new(1700000000000));
    }

    #[tokio::test]
    async fn test_join_room_leaves_previous_room() {
        // テスト項目: 別のルームに参加すると元のルームから退出し、元のルームに参加者リストが送られる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let first = create_room(&repository, "first", 10).await;
        let second = create_room(&repository, "second", 10).await;
        let alice = UserId::generate();
        let bob = UserId::generate();
        for (user, nickname) in [(&alice, "alice"), (&bob, "bob")] {
            repository
                .add_member(
                    &first,
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
        let bob_for_check = bob.clone();
        pusher
            .expect_broadcast()
            .withf(move |targets, content| {
                targets == &vec![bob_for_check.clone()]
                    && content.contains("userList")
                    && !content.contains("alice")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = create_usecase(repository.clone(), pusher);

        // when (操作):
        let result = usecase
            .execute(
                &alice,
                "alice".to_string(),
                None,
                "second".to_string(),
                Some(&first),
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let first_members = repository.get_members(&first).await.unwrap();
        assert_eq!(first_members.len(), 1);
        assert_eq!(first_members[0].id, bob);
        assert_eq!(repository.get_members(&second).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejoin_same_room_does_not_leave() {
        // テスト項目: 参加中のルームに再参加しても退出処理は行われない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = create_room(&repository, "room-42", 10).await;
        let alice = UserId::generate();
        let usecase = create_usecase(repository.clone(), MockMessagePusher::new());
        usecase
            .execute(&alice, "alice".to_string(), None, "room-42".to_string(), None)
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(
                &alice,
                "alice".to_string(),
                None,
                "room-42".to_string(),
                Some(&room_id),
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repository.get_members(&room_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_join_unknown_room() {
        // テスト項目: 存在しないルームへの参加は RoomNotFound になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = create_usecase(repository, MockMessagePusher::new());

        // when (操作):
        let result = usecase
            .execute(
                &UserId::generate(),
                "alice".to_string(),
                None,
                "missing".to_string(),
                None,
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinRoomError::RoomNotFound("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_join_full_room() {
        // テスト項目: 満員のルームへの参加は RoomFull になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        create_room(&repository, "tiny", 1).await;
        let usecase = create_usecase(repository, MockMessagePusher::new());
        usecase
            .execute(&UserId::generate(), "bob".to_string(), None, "tiny".to_string(), None)
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(&UserId::generate(), "alice".to_string(), None, "tiny".to_string(), None)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::RoomFull));
    }

    #[tokio::test]
    async fn test_join_blank_room_id() {
        // テスト項目: 空白のルーム ID では参加できない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = create_usecase(repository, MockMessagePusher::new());

        // when (操作):
        let result = usecase
            .execute(&UserId::generate(), "alice".to_string(), None, " ".to_string(), None)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(JoinRoomError::InvalidRoomId(_))));
    }
}
