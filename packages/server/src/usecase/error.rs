//! UseCase 層のエラー型
//!
//! `Display` の文字列はそのまま `error` フレームのメッセージとしてクライアントに届きます。

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("invalid nickname: {0}")]
    InvalidNickname(ValueObjectError),

    #[error("failed to store room: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("invalid nickname: {0}")]
    InvalidNickname(ValueObjectError),

    #[error("invalid room id: {0}")]
    InvalidRoomId(ValueObjectError),

    #[error("room not found: {0}")]
    RoomNotFound(String),

    #[error("room is full")]
    RoomFull,

    #[error("failed to join room: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("not a member of room {0}")]
    NotInRoom(String),

    #[error("invalid message body: {0}")]
    InvalidBody(ValueObjectError),

    #[error("failed to store message: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("not a member of room {0}")]
    NotInRoom(String),
}
