//! Conversion from domain entities to wire frames.

use hiroba_shared::protocol::{MessagePayload, ServerFrame, UserPayload, UserSettings};

use crate::domain::{ChatMessage, Member};

impl From<&ChatMessage> for MessagePayload {
    fn from(message: &ChatMessage) -> Self {
        Self {
            room_id: Some(message.room_id.as_str().to_string()),
            body: message.body.as_str().to_string(),
            user_nickname: message.sender.as_ref().map(|n| n.as_str().to_string()),
            is_system_message: message.is_system,
            timestamp: message.timestamp.value(),
            user_icon: message.icon.clone(),
        }
    }
}

impl From<&Member> for UserPayload {
    fn from(member: &Member) -> Self {
        Self {
            user_id: Some(member.id.as_str().to_string()),
            user_settings: Some(UserSettings {
                user_nickname: Some(member.nickname.as_str().to_string()),
                user_icon: member.icon.clone(),
            }),
        }
    }
}

/// 参加者リストから `userList` フレームを作成
pub fn user_list_frame(members: &[Member]) -> ServerFrame {
    ServerFrame::UserList {
        users: members.iter().map(UserPayload::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, Nickname, RoomId, Timestamp, UserId};

    #[test]
    fn test_chat_message_to_payload() {
        // テスト項目: ドメインの ChatMessage がワイヤー上のメッセージに変換される
        // given (前提条件):
        let message = ChatMessage {
            room_id: RoomId::new("room-42".to_string()).unwrap(),
            sender: Some(Nickname::new("bob".to_string()).unwrap()),
            body: MessageBody::new("hi".to_string()).unwrap(),
            is_system: false,
            icon: Some("dog".to_string()),
            timestamp: Timestamp::new(2000),
        };

        // when (操作):
        let payload = MessagePayload::from(&message);

        // then (期待する結果):
        assert_eq!(
            payload,
            MessagePayload {
                room_id: Some("room-42".to_string()),
                body: "hi".to_string(),
                user_nickname: Some("bob".to_string()),
                is_system_message: false,
                timestamp: 2000,
                user_icon: Some("dog".to_string()),
            }
        );
    }

    #[test]
    fn test_system_message_has_no_nickname() {
        // テスト項目: 送信者のいないメッセージはニックネームなしで変換される
        // given (前提条件):
        let message = ChatMessage {
            room_id: RoomId::new("room-42".to_string()).unwrap(),
            sender: None,
            body: MessageBody::new("welcome".to_string()).unwrap(),
            is_system: true,
            icon: None,
            timestamp: Timestamp::new(0),
        };

        // when (操作):
        let payload = MessagePayload::from(&message);

        // then (期待する結果):
        assert!(payload.is_system_message);
        assert_eq!(payload.user_nickname, None);
    }

    #[test]
    fn test_user_list_frame() {
        // テスト項目: 参加者リストが参加順のまま userList フレームになる
        // given (前提条件):
        let alice = Member::new(
            UserId::generate(),
            Nickname::new("alice".to_string()).unwrap(),
            None,
            Timestamp::new(0),
        );
        let bob = Member::new(
            UserId::generate(),
            Nickname::new("bob".to_string()).unwrap(),
            Some("dog".to_string()),
            Timestamp::new(1),
        );

        // when (操作):
        let frame = user_list_frame(&[alice.clone(), bob]);

        // then (期待する結果):
        let ServerFrame::UserList { users } = frame else {
            panic!("expected userList frame");
        };
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id.as_deref(), Some(alice.id.as_str()));
        let bob_settings = users[1].user_settings.clone().unwrap();
        assert_eq!(bob_settings.user_nickname.as_deref(), Some("bob"));
        assert_eq!(bob_settings.user_icon.as_deref(), Some("dog"));
    }
}
