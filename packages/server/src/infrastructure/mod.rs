//! Infrastructure 層
//!
//! ドメイン層のインターフェース（Repository, MessagePusher）の具体的な実装と、
//! ドメインモデルとワイヤーフォーマットの変換を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
