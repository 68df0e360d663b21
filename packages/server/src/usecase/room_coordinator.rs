//! UseCase: ルームコーディネーター
//!
//! ## 責務
//!
//! - ルームのメンバー表と接続の所属（affiliation）表の管理
//! - 受信イベントごとの状態更新と、配信先（fan-out）の計算
//! - `MessagePusher` 経由での外向きイベント送信
//!
//! ## 並行性
//!
//! 2 つの表は 1 つの `RoomRegistry` にまとめ、単一の Mutex で保護します。
//! 配信もロックを保持したまま行うため、同じルームのメンバーは
//! コーディネーターが生成した順序どおりにイベントを受け取ります。
//! `MessagePusher` への送信はチャンネルへの書き込みのみで、ブロックしません。

use std::sync::Arc;

use coderoom_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    config::{CoordinatorConfig, RelayPolicy},
    domain::{
        Affiliation, ConnectionId, Delivery, MessagePusher, OutboundEvent, ParticipantName,
        PusherChannel, Room, RoomKey, RoomRegistry,
    },
    infrastructure::dto::websocket::ServerEvent,
};

use super::error::CoordinatorError;

/// Room membership and event-broadcast coordinator
pub struct RoomCoordinator {
    registry: Mutex<RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    config: CoordinatorConfig,
}

impl RoomCoordinator {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new(clock)),
            message_pusher,
            config,
        }
    }

    /// Register the outbound channel of a newly accepted connection
    pub async fn connect(&self, connection: ConnectionId, sender: PusherChannel) {
        self.message_pusher.register_client(connection, sender).await;
        tracing::info!("Connection '{}' opened", connection);
    }

    /// Join `room` as `name`.
    ///
    /// A connection already joined elsewhere is detached first; the previous
    /// room's membership is broadcast before the new room's.
    pub async fn join(
        &self,
        connection: ConnectionId,
        room: RoomKey,
        name: ParticipantName,
    ) -> Result<(), CoordinatorError> {
        let mut registry = self.registry.lock().await;
        let deliveries = registry.join(connection, room.clone(), name.clone());
        tracing::info!(
            "'{}' joined room '{}' (connection '{}')",
            name,
            room,
            connection
        );
        self.deliver_all(deliveries).await
    }

    /// Relay document content to the other connections of `room`
    pub async fn code_change(
        &self,
        connection: ConnectionId,
        room: RoomKey,
        code: String,
    ) -> Result<(), CoordinatorError> {
        let include_sender = self.config.echo_code_to_sender;
        self.relay(
            connection,
            room,
            include_sender,
            OutboundEvent::CodeUpdated(code),
        )
        .await
    }

    /// Relay the selected language to `room`
    pub async fn language_change(
        &self,
        connection: ConnectionId,
        room: RoomKey,
        language: String,
    ) -> Result<(), CoordinatorError> {
        self.relay(connection, room, true, OutboundEvent::LanguageChanged(language))
            .await
    }

    /// Relay a typing pulse. An empty name is relayed as a cleared indicator.
    pub async fn typing(
        &self,
        connection: ConnectionId,
        room: RoomKey,
        name: String,
    ) -> Result<(), CoordinatorError> {
        let name = ParticipantName::new(name).ok();
        self.relay(connection, room, true, OutboundEvent::TypingChanged(name))
            .await
    }

    /// Relay a cleared typing indicator
    pub async fn stop_typing(
        &self,
        connection: ConnectionId,
        room: RoomKey,
    ) -> Result<(), CoordinatorError> {
        self.relay(connection, room, true, OutboundEvent::TypingChanged(None))
            .await
    }

    /// Leave the current room. No-op without an affiliation.
    pub async fn leave_room(&self, connection: ConnectionId) -> Result<(), CoordinatorError> {
        let mut registry = self.registry.lock().await;
        match registry.leave(&connection) {
            Some(delivery) => {
                tracing::info!("Connection '{}' left its room", connection);
                self.deliver(delivery).await
            }
            None => {
                tracing::debug!("Connection '{}' is not in a room; nothing to leave", connection);
                Ok(())
            }
        }
    }

    /// Connection lost: same membership effect as `leave_room`, then the
    /// outbound channel is dropped.
    pub async fn disconnect(&self, connection: ConnectionId) -> Result<(), CoordinatorError> {
        let result = self.leave_room(connection).await;
        self.message_pusher.unregister_client(&connection).await;
        tracing::info!("Connection '{}' closed", connection);
        result
    }

    pub async fn affiliation(&self, connection: &ConnectionId) -> Option<Affiliation> {
        self.registry.lock().await.affiliation(connection).cloned()
    }

    /// Snapshot of all non-empty rooms, sorted by key
    pub async fn rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        registry.rooms().into_iter().cloned().collect()
    }

    /// Snapshot of one room, `None` when it is empty
    pub async fn room(&self, key: &RoomKey) -> Option<Room> {
        self.registry.lock().await.room(key).cloned()
    }

    async fn relay(
        &self,
        connection: ConnectionId,
        room: RoomKey,
        include_sender: bool,
        event: OutboundEvent,
    ) -> Result<(), CoordinatorError> {
        let registry = self.registry.lock().await;
        if self.config.relay_policy == RelayPolicy::Affiliated
            && !registry.is_affiliated_with(&connection, &room)
        {
            return Err(CoordinatorError::NotAffiliated {
                room: room.into_string(),
            });
        }

        let exclude = (!include_sender).then_some(&connection);
        let delivery = registry.relay(&room, exclude, event);
        tracing::debug!(
            "Relaying {:?} from '{}' to {} connection(s) in room '{}'",
            delivery.event,
            connection,
            delivery.recipients.len(),
            room
        );
        self.deliver(delivery).await
    }

    async fn deliver_all(&self, deliveries: Vec<Delivery>) -> Result<(), CoordinatorError> {
        for delivery in deliveries {
            self.deliver(delivery).await?;
        }
        Ok(())
    }

    async fn deliver(&self, delivery: Delivery) -> Result<(), CoordinatorError> {
        if delivery.recipients.is_empty() {
            return Ok(());
        }
        let message = serde_json::to_string(&ServerEvent::from(delivery.event))?;
        self.message_pusher
            .broadcast(delivery.recipients, &message)
            .await?;
        Ok(())
    }
}
