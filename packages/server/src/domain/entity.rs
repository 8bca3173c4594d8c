//! エンティティ

use std::collections::VecDeque;

use serde::Serialize;

use super::{
    error::RoomError,
    value_object::{MessageBody, Nickname, RoomId, Timestamp, UserId},
};

/// ルームのデフォルト最大参加者数
pub const DEFAULT_MAX_MEMBERS: usize = 100;
/// ルームが保持するメッセージ履歴のデフォルト件数
pub const DEFAULT_MAX_MESSAGES: usize = 1000;

/// ルームの参加者
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: UserId,
    pub nickname: Nickname,
    pub icon: Option<String>,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(id: UserId, nickname: Nickname, icon: Option<String>, joined_at: Timestamp) -> Self {
        Self {
            id,
            nickname,
            icon,
            joined_at,
        }
    }
}

/// ルームに記録されたメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub room_id: RoomId,
    /// システムメッセージには送信者がいない
    pub sender: Option<Nickname>,
    pub body: MessageBody,
    pub is_system: bool,
    pub icon: Option<String>,
    pub timestamp: Timestamp,
}

/// チャットルーム
///
/// 参加者は参加順、メッセージは追加順に保持します。
/// 履歴が上限に達すると最も古いメッセージから破棄します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub members: Vec<Member>,
    pub messages: VecDeque<ChatMessage>,
    max_members: usize,
    max_messages: usize,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_MAX_MEMBERS, DEFAULT_MAX_MESSAGES)
    }

    pub fn with_capacity(
        id: RoomId,
        created_at: Timestamp,
        max_members: usize,
        max_messages: usize,
    ) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            messages: VecDeque::new(),
            max_members,
            max_messages,
        }
    }

    /// 参加者を追加
    ///
    /// 同じ UserId の参加者が既にいる場合は置き換えます（ニックネームの変更）。
    pub fn add_member(&mut self, member: Member) -> Result<(), RoomError> {
        if let Some(existing) = self.members.iter_mut().find(|m| m.id == member.id) {
            *existing = member;
            return Ok(());
        }
        if self.members.len() >= self.max_members {
            return Err(RoomError::RoomFull(self.max_members));
        }
        self.members.push(member);
        Ok(())
    }

    /// 参加者を削除し、削除したかどうかを返す
    pub fn remove_member(&mut self, user_id: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| &m.id != user_id);
        self.members.len() != before
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.id == user_id)
    }

    pub fn member(&self, user_id: &UserId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == user_id)
    }

    /// メッセージを履歴に追加し、上限を超えて押し出されたメッセージを返す
    pub fn add_message(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        let evicted = if self.messages.len() >= self.max_messages {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &UserId, nickname: &str) -> Member {
        Member::new(
            id.clone(),
            Nickname::new(nickname.to_string()).unwrap(),
            None,
            Timestamp::new(1000),
        )
    }

    fn message(room: &Room, body: &str) -> ChatMessage {
        ChatMessage {
            room_id: room.id.clone(),
            sender: None,
            body: MessageBody::new(body.to_string()).unwrap(),
            is_system: true,
            icon: None,
            timestamp: Timestamp::new(2000),
        }
    }

    fn create_test_room(max_members: usize, max_messages: usize) -> Room {
        Room::with_capacity(
            RoomId::new("room-42".to_string()).unwrap(),
            Timestamp::new(0),
            max_members,
            max_messages,
        )
    }

    #[test]
    fn test_add_member_success() {
        // テスト項目: 参加者を追加できる
        // given (前提条件):
        let mut room = create_test_room(10, 10);
        let alice = UserId::generate();

        // when (操作):
        let result = room.add_member(member(&alice, "alice"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(room.is_member(&alice));
    }

    #[test]
    fn test_add_member_replaces_same_user() {
        // テスト項目: 同じユーザーが再度参加すると参加者情報が置き換えられる
        // given (前提条件):
        let mut room = create_test_room(10, 10);
        let alice = UserId::generate();
        room.add_member(member(&alice, "alice")).unwrap();

        // when (操作):
        room.add_member(member(&alice, "alice2")).unwrap();

        // then (期待する結果):
        assert_eq!(room.members.len(), 1);
        assert_eq!(room.member(&alice).unwrap().nickname.as_str(), "alice2");
    }

    #[test]
    fn test_add_member_room_full() {
        // テスト項目: 定員を超える参加はエラーになる
        // given (前提条件):
        let mut room = create_test_room(1, 10);
        room.add_member(member(&UserId::generate(), "alice")).unwrap();

        // when (操作):
        let result = room.add_member(member(&UserId::generate(), "bob"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull(1)));
    }

    #[test]
    fn test_remove_member() {
        // テスト項目: 参加者を削除でき、存在しない参加者の削除は false を返す
        // given (前提条件):
        let mut room = create_test_room(10, 10);
        let alice = UserId::generate();
        room.add_member(member(&alice, "alice")).unwrap();

        // when (操作):
        let removed = room.remove_member(&alice);
        let removed_again = room.remove_member(&alice);

        // then (期待する結果):
        assert!(removed);
        assert!(!removed_again);
        assert!(room.members.is_empty());
    }

    #[test]
    fn test_add_message_drops_oldest_when_full() {
        // テスト項目: 履歴が上限に達すると最も古いメッセージが押し出される
        // given (前提条件):
        let mut room = create_test_room(10, 2);
        assert_eq!(room.add_message(message(&room, "1")), None);
        assert_eq!(room.add_message(message(&room, "2")), None);

        // when (操作):
        let evicted = room.add_message(message(&room, "3"));

        // then (期待する結果):
        assert_eq!(evicted.map(|m| m.body.as_str().to_string()).as_deref(), Some("1"));
        let bodies: Vec<&str> = room.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["2", "3"]);
    }
}
