//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({length} > {max} characters)")]
    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },
}

/// Room エンティティの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room is full ({0} members)")]
    RoomFull(usize),
}

/// Repository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room not found: {0}")]
    RoomNotFound(String),

    #[error("room already exists: {0}")]
    RoomAlreadyExists(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client not found: {0}")]
    ClientNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),
}
