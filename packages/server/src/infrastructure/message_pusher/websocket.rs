//! WebSocket を使った MessagePusher 実装
//!
//! WebSocket 接続の受付と sender の生成は UI 層が行い、
//! この実装は受け取った sender を UserId ごとに保持して送信に使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, UserId};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの sender
    clients: Arc<Mutex<HashMap<UserId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中のクライアント数
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, user_id: UserId, sender: PusherChannel) {
        tracing::debug!("User '{}' registered to MessagePusher", user_id);
        self.clients.lock().await.insert(user_id, sender);
    }

    async fn unregister_client(&self, user_id: &UserId) {
        self.clients.lock().await.remove(user_id);
        tracing::debug!("User '{}' unregistered from MessagePusher", user_id);
    }

    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(user_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(user_id.as_str().to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to user '{}'", user_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<UserId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // 切断直後のクライアントへの送信失敗は無視する
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to user '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("User '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(())
    }
}
