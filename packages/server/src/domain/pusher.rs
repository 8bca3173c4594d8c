//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信（通知）を抽象化します。
//! 送信先の管理と送信方法は Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, UserId};

/// クライアントへ JSON テキストを届けるチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録
    async fn register_client(&self, user_id: UserId, sender: PusherChannel);

    /// クライアントの登録を解除
    async fn unregister_client(&self, user_id: &UserId);

    /// 特定のクライアントに送信
    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信
    ///
    /// 一部のクライアントへの送信失敗は許容します。
    async fn broadcast(&self, targets: Vec<UserId>, content: &str)
    -> Result<(), MessagePushError>;
}
