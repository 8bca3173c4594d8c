//! ドメイン層
//!
//! - `value_object`: 検証済みの値（RoomId, UserId, Nickname, MessageBody, Timestamp）
//! - `entity`: Room, Member, ChatMessage
//! - `repository` / `pusher`: Infrastructure 層が実装するインターフェース

pub mod entity;
pub mod error;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Member, Room};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{MessageBody, Nickname, RoomId, RoomIdFactory, Timestamp, UserId};

#[cfg(test)]
pub use pusher::MockMessagePusher;
