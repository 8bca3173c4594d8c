//! UseCase: ルーム作成
//!
//! 作成したユーザーはルームに参加しません。参加は `joinChatRoom` で行います。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{Nickname, Room, RoomId, RoomIdFactory, RoomRepository, Timestamp};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// ルームを作成し、新しい RoomId を返す
    ///
    /// ニックネームが空の場合はルームを作成しません。
    pub async fn execute(&self, nickname: String) -> Result<RoomId, CreateRoomError> {
        let nickname = Nickname::new(nickname).map_err(CreateRoomError::InvalidNickname)?;

        let room = Room::new(
            RoomIdFactory::generate(),
            Timestamp::new(self.clock.now_millis()),
        );
        let room_id = room.id.clone();
        self.repository
            .create_room(room)
            .await
            .map_err(CreateRoomError::Repository)?;

        tracing::info!("Room '{}' created by '{}'", room_id, nickname.as_str());
        Ok(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ValueObjectError, infrastructure::repository::InMemoryRoomRepository};
    use hiroba_shared::time::FixedClock;

    fn create_usecase() -> (CreateRoomUseCase, Arc<InMemoryRoomRepository>) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = CreateRoomUseCase::new(
            repository.clone(),
            Arc::new(FixedClock::new(1700000000000)),
        );
        (usecase, repository)
    }

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: ルームが作成され、作成時刻は Clock の時刻になる
        // given (前提条件):
        let (usecase, repository) = create_usecase();

        // when (操作):
        let room_id = usecase.execute("alice".to_string()).await.unwrap();

        // then (期待する結果):
        let room = repository.get_room(&room_id).await.unwrap();
        assert_eq!(room.created_at, Timestamp::new(1700000000000));
        assert!(room.members.is_empty());
    }

    #[tokio::test]
    async fn test_create_room_empty_nickname() {
        // テスト項目: 空のニックネームではルームが作成されない
        // given (前提条件):
        let (usecase, repository) = create_usecase();

        // when (操作):
        let result = usecase.execute("  ".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CreateRoomError::InvalidNickname(ValueObjectError::Empty(
                "nickname"
            )))
        );
        assert!(repository.list_rooms().await.is_empty());
    }
}
