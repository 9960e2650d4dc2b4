//! Connection Registry
//!
//! ## 責務
//!
//! - 接続中のリアルタイム接続（`PusherChannel`）の集合を保持する
//! - add / remove / snapshot を一つの Mutex で相互排他にする
//!
//! ## 設計ノート
//!
//! ブロードキャストはロック中に送信せず、`snapshot()` で取得したコピーに対して送信する。
//! ロックの保持は挿入・削除・コピーの間だけに限られる。

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, PusherChannel};

/// Set of live real-time connections
#[derive(Default)]
pub struct ConnectionRegistry {
    /// Key: ConnectionId, Value: PusherChannel
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
    /// 接続数の上限（None なら無制限）
    capacity: Option<usize>,
}

impl ConnectionRegistry {
    /// Create an unbounded registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that rejects `add` once `capacity` connections are registered
    ///
    /// `None` means unbounded.
    pub fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Register a connection
    ///
    /// Each upgrade produces a fresh `ConnectionId`, so no duplicate check is
    /// performed. Fails only when the capacity limit is reached.
    pub async fn add(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), MessagePushError> {
        let mut connections = self.connections.lock().await;
        if let Some(limit) = self.capacity
            && connections.len() >= limit
        {
            return Err(MessagePushError::CapacityExceeded(limit));
        }
        connections.insert(connection_id, channel);
        Ok(())
    }

    /// Remove a connection if present
    ///
    /// Idempotent: both the connection task and the broadcaster may call this
    /// for the same connection. Returns the removed channel, if any.
    pub async fn remove(&self, connection_id: &ConnectionId) -> Option<PusherChannel> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id)
    }

    /// Point-in-time copy of the current members
    pub async fn snapshot(&self) -> Vec<(ConnectionId, PusherChannel)> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .map(|(id, channel)| (*id, channel.clone()))
            .collect()
    }

    pub async fn contains(&self, connection_id: &ConnectionId) -> bool {
        let connections = self.connections.lock().await;
        connections.contains_key(connection_id)
    }

    pub async fn len(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether another connection would currently be accepted
    pub async fn has_capacity(&self) -> bool {
        match self.capacity {
            Some(limit) => self.len().await < limit,
            None => true,
        }
    }
}
