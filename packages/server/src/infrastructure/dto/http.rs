//! HTTP API response DTOs.

use serde::Serialize;

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::Room;

/// `GET /api/rooms` の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    /// 参加者のニックネーム（参加順）
    pub members: Vec<String>,
    /// 記録されているメッセージ数
    pub messages: usize,
    /// RFC 3339 (UTC)
    pub created_at: Option<String>,
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room
                .members
                .iter()
                .map(|m| m.nickname.as_str().to_string())
                .collect(),
            messages: room.messages.len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Member, Nickname, RoomId, Timestamp, UserId};

    #[test]
    fn test_room_summary_serializes_camel_case() {
        // テスト項目: ルーム概要が camelCase の JSON になる
        // given (前提条件):
        let mut room = Room::new(
            RoomId::new("room-42".to_string()).unwrap(),
            Timestamp::new(1700000000000),
        );
        room.add_member(Member::new(
            UserId::generate(),
            Nickname::new("alice".to_string()).unwrap(),
            None,
            Timestamp::new(1700000000000),
        ))
        .unwrap();

        // when (操作):
        let json = serde_json::to_value(RoomSummaryDto::from(&room)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "id": "room-42",
                "members": ["alice"],
                "messages": 0,
                "createdAt": "2023-11-14T22:13:20+00:00",
            })
        );
    }
}
