//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 接続群へのメッセージ送信（broadcast）
//!
//! WebSocket の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）で行われ、
//! この実装は受け取った sender をメッセージ送信にのみ使用します。
//! 送信は unbounded チャンネルへの書き込みなので、遅い宛先が他の宛先を待たせることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: RwLock<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.write().await;
        clients.insert(connection, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_client(&self, connection: &ConnectionId) {
        let mut clients = self.clients.write().await;
        clients.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.read().await;

        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = push(&clients, &target, content) {
                tracing::warn!("Skipping connection during broadcast: {}", e);
            }
        }

        Ok(())
    }
}

/// 単一の接続に送信
fn push(
    clients: &HashMap<ConnectionId, PusherChannel>,
    connection: &ConnectionId,
    content: &str,
) -> Result<(), MessagePushError> {
    let sender = clients
        .get(connection)
        .ok_or_else(|| MessagePushError::ClientNotFound(connection.to_string()))?;
    sender
        .send(content.to_string())
        .map_err(|e| MessagePushError::PushFailed(format!("'{}': {}", connection, e)))?;
    tracing::trace!("Pushed message to connection '{}'", connection);
    Ok(())
}
