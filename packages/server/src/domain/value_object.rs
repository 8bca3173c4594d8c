//! 値オブジェクト
//!
//! 生成時に検証を行い、不正な値が存在しないことを型で保証します。

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// ニックネームの最大文字数
pub const MAX_NICKNAME_LENGTH: usize = 32;
/// メッセージ本文の最大文字数
pub const MAX_MESSAGE_BODY_LENGTH: usize = 2000;

fn validate(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    let length = trimmed.chars().count();
    if length > max {
        return Err(ValueObjectError::TooLong { field, length, max });
    }
    Ok(trimmed.to_string())
}

/// ルーム ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::Empty("room id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// UUID v4 から新しい RoomId を生成
    pub fn generate() -> RoomId {
        RoomId(Uuid::new_v4().to_string())
    }
}

/// 接続ごとにサーバーが割り当てるユーザー ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(String);

impl UserId {
    /// UUID v4 から新しい UserId を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ニックネーム（前後の空白を除いて 1〜32 文字）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate("nickname", value, MAX_NICKNAME_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// メッセージ本文（前後の空白を除いて 1〜2000 文字）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate("message body", value, MAX_MESSAGE_BODY_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_rejects_blank() {
        // テスト項目: 空白のみの RoomId は作成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("room id")));
    }

    #[test]
    fn test_room_id_factory_generates_unique_ids() {
        // テスト項目: RoomIdFactory は毎回異なる ID を生成する
        // given (前提条件):

        // when (操作):
        let first = RoomIdFactory::generate();
        let second = RoomIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(!first.as_str().is_empty());
    }

    #[test]
    fn test_nickname_is_trimmed() {
        // テスト項目: ニックネームの前後の空白は取り除かれる
        // given (前提条件):
        let value = "  alice ".to_string();

        // when (操作):
        let nickname = Nickname::try_from(value).unwrap();

        // then (期待する結果):
        assert_eq!(nickname.as_str(), "alice");
    }

    #[test]
    fn test_nickname_rejects_empty() {
        // テスト項目: 空のニックネームは作成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = Nickname::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("nickname")));
    }

    #[test]
    fn test_nickname_rejects_too_long() {
        // テスト項目: 上限を超えるニックネームは作成できない
        // given (前提条件):
        let value = "a".repeat(MAX_NICKNAME_LENGTH + 1);

        // when (操作):
        let result = Nickname::new(value);

        // then (期待する結果):
        assert!(matches!(result, Err(ValueObjectError::TooLong { .. })));
    }

    #[test]
    fn test_message_body_counts_characters_not_bytes() {
        // テスト項目: 本文の長さはバイト数ではなく文字数で判定される
        // given (前提条件):
        let value = "あ".repeat(MAX_MESSAGE_BODY_LENGTH);

        // when (操作):
        let result = MessageBody::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
