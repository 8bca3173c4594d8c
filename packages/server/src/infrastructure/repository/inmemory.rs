//! InMemory Room Repository 実装
//!
//! RoomId をキーとする HashMap をインメモリ DB として使用します。
//! サーバーを停止すると全てのルームは失われます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, Member, RepositoryError, Room, RoomId, RoomRepository, UserId};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(room_id: &RoomId) -> RepositoryError {
    RepositoryError::RoomNotFound(room_id.as_str().to_string())
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::RoomAlreadyExists(
                room.id.as_str().to_string(),
            ));
        }
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned().ok_or_else(|| not_found(room_id))
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        list
    }

    async fn add_member(
        &self,
        room_id: &RoomId,
        member: Member,
    ) -> Result<Vec<Member>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.add_member(member)?;
        Ok(room.members.clone())
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Vec<Member>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        if !room.remove_member(user_id) {
            tracing::debug!(
                "User '{}' was not a member of room '{}'",
                user_id,
                room_id
            );
        }
        Ok(room.members.clone())
    }

    async fn add_message(
        &self,
        room_id: &RoomId,
        message: ChatMessage,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        if let Some(evicted) = room.add_message(message) {
            tracing::debug!(
                "Room '{}' history is full; dropped the message at {}",
                room_id,
                evicted.timestamp.value()
            );
        }
        Ok(())
    }

    async fn get_members(&self, room_id: &RoomId) -> Result<Vec<Member>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|room| room.members.clone())
            .ok_or_else(|| not_found(room_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, Nickname, Timestamp};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ルームの作成・取得・一覧
    // - 参加者の追加・削除と、その結果として返される参加者リスト
    // - 存在しないルームへの操作がエラーになること
    // ========================================

    fn room(id: &str, created_at: i64) -> Room {
        Room::new(RoomId::new(id.to_string()).unwrap(), Timestamp::new(created_at))
    }

    fn member(id: &UserId, nickname: &str) -> Member {
        Member::new(
            id.clone(),
            Nickname::new(nickname.to_string()).unwrap(),
            None,
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_room() {
        // テスト項目: 作成したルームを取得できる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_id = RoomId::new("room-42".to_string()).unwrap();

        // when (操作):
        repo.create_room(room("room-42", 0)).await.unwrap();
        let result = repo.get_room(&room_id).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().id, room_id);
    }

    #[tokio::test]
    async fn test_create_room_duplicate() {
        // テスト項目: 同じ ID のルームは二重に作成できない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.create_room(room("room-42", 0)).await.unwrap();

        // when (操作):
        let result = repo.create_room(room("room-42", 1)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomAlreadyExists("room-42".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_room_not_found() {
        // テスト項目: 存在しないルームの取得はエラーになる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_id = RoomId::new("missing".to_string()).unwrap();

        // when (操作):
        let result = repo.get_room(&room_id).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_list_rooms_sorted_by_creation() {
        // テスト項目: ルーム一覧は作成日時順で返される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.create_room(room("late", 300)).await.unwrap();
        repo.create_room(room("early", 100)).await.unwrap();
        repo.create_room(room("middle", 200)).await.unwrap();

        // when (操作):
        let rooms = repo.list_rooms().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "middle", "late"]);
    }

    #[tokio::test]
    async fn test_add_and_remove_member() {
        // テスト項目: 参加者の追加と削除が参加者リストに反映される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.create_room(room("room-42", 0)).await.unwrap();
        let room_id = RoomId::new("room-42".to_string()).unwrap();
        let alice = UserId::generate();
        let bob = UserId::generate();

        // when (操作):
        repo.add_member(&room_id, member(&alice, "alice"))
            .await
            .unwrap();
        let after_join = repo.add_member(&room_id, member(&bob, "bob")).await.unwrap();
        let after_leave = repo.remove_member(&room_id, &alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(after_join.len(), 2);
        assert_eq!(after_leave.len(), 1);
        assert_eq!(after_leave[0].id, bob);
        assert_eq!(repo.get_members(&room_id).await.unwrap(), after_leave);
    }

    #[tokio::test]
    async fn test_remove_nonmember_is_ok() {
        // テスト項目: 参加していないユーザーの削除はエラーにならない（冪等性）
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.create_room(room("room-42", 0)).await.unwrap();
        let room_id = RoomId::new("room-42".to_string()).unwrap();

        // when (操作):
        let result = repo.remove_member(&room_id, &UserId::generate()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_add_message_keeps_latest_history() {
        // テスト項目: 履歴の上限を超えても追加は成功し、最新のメッセージだけが残る
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room_id = RoomId::new("tiny".to_string()).unwrap();
        repo.create_room(Room::with_capacity(room_id.clone(), Timestamp::new(0), 10, 1))
            .await
            .unwrap();
        let message = |body: &str, timestamp: i64| ChatMessage {
            room_id: room_id.clone(),
            sender: None,
            body: MessageBody::new(body.to_string()).unwrap(),
            is_system: false,
            icon: None,
            timestamp: Timestamp::new(timestamp),
        };
        repo.add_message(&room_id, message("first", 1)).await.unwrap();

        // when (操作):
        let result = repo.add_message(&room_id, message("second", 2)).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        let room = repo.get_room(&room_id).await.unwrap();
        assert_eq!(room.messages.len(), 1);
        assert_eq!(room.messages[0].body.as_str(), "second");
    }
}
