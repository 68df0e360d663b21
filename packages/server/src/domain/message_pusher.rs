//! MessagePusher trait 定義
//!
//! コーディネーターが外向きイベントを送信するためのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

use super::{error::MessagePushError, value_object::ConnectionId};

/// Outbound channel of one connection (already-encoded text frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 外向きメッセージ送信の抽象化
///
/// 送信は非ブロッキングでなければならない。ある宛先への送信の失敗や遅延が
/// 他の宛先への送信を妨げてはならない。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection: &ConnectionId);

    /// 複数の接続に送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
