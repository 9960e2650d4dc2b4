//! MessagePusher trait 定義
//!
//! リアルタイム接続への通知（ブロードキャスト）のインターフェース。
//! 接続の生成は UI 層、接続集合の管理と送信は Infrastructure 層が担当する。

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::{BroadcastEvent, ConnectionId, MessagePushError};

/// Lifecycle of a real-time connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Connection state shared between the connection task and the registry
///
/// State only moves forward: Open → Closing → Closed.
#[derive(Debug, Clone)]
pub struct ConnectionStateCell(Arc<AtomicU8>);

impl ConnectionStateCell {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ConnectionState::Open as u8)))
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Advance to `next`; moving backwards is ignored
    pub fn advance(&self, next: ConnectionState) {
        self.0.fetch_max(next as u8, Ordering::AcqRel);
    }
}

impl Default for ConnectionStateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a single delivery attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushFailure {
    #[error("connection is {0:?}")]
    NotOpen(ConnectionState),

    #[error("outbound queue is full")]
    QueueFull,

    #[error("outbound queue is closed")]
    QueueClosed,
}

/// Outbound side of one connection as seen by the broadcaster
///
/// Wraps the bounded queue drained by the connection's writer task plus the
/// connection's lifecycle state.
#[derive(Debug, Clone)]
pub struct PusherChannel {
    sender: mpsc::Sender<String>,
    state: ConnectionStateCell,
}

impl PusherChannel {
    pub fn new(sender: mpsc::Sender<String>, state: ConnectionStateCell) -> Self {
        Self { sender, state }
    }

    /// Enqueue a payload without waiting
    pub fn try_push(&self, payload: String) -> Result<(), PushFailure> {
        match self.state.get() {
            ConnectionState::Open => {}
            other => return Err(PushFailure::NotOpen(other)),
        }
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => PushFailure::QueueFull,
            TrySendError::Closed(_) => PushFailure::QueueClosed,
        })
    }

    /// Mark the connection as no longer deliverable
    pub fn mark_closing(&self) {
        self.state.advance(ConnectionState::Closing);
    }
}

/// Outcome of one broadcast call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信キューに積めた接続数
    pub delivered: usize,
    /// 送信に失敗し Registry から削除された接続
    pub pruned: Vec<ConnectionId>,
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録する（容量上限に達している場合はエラー）
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// 接続の登録を解除する（冪等、削除した場合は true）
    async fn unregister_connection(&self, connection_id: &ConnectionId) -> bool;

    /// イベントを全ての接続にブロードキャストする
    ///
    /// 個々の接続への送信失敗はエラーにせず、その接続を登録解除する。
    async fn broadcast(&self, event: &BroadcastEvent) -> Result<BroadcastReport, MessagePushError>;

    /// 登録中の接続数
    async fn connection_count(&self) -> usize;

    /// 新しい接続を受け入れる余地があるか
    async fn has_capacity(&self) -> bool;
}
