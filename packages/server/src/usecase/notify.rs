//! Ordered commit-then-broadcast step shared by the mutating use cases.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 並行する更新（編集と削除）のブロードキャスト順序
//!
//! ### なぜこのテストが必要か
//! - 保存の順序とイベントの配信順序が食い違うと、削除済みのメッセージが
//!   クライアント側で復活して見える

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{BroadcastEvent, MessagePusher};

/// Serializes store mutations together with their broadcasts
///
/// Every mutating use case holds the guard from the store call until its
/// event has been enqueued, so subscribers see events in commit order.
/// The broadcast only does non-blocking enqueues, so the guard is short-lived.
#[derive(Debug, Default)]
pub struct MutationSequencer(Mutex<()>);

impl MutationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for our turn to commit and broadcast
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}

/// Broadcast `event`, logging instead of failing
///
/// Called after the store mutation has committed, while the caller still
/// holds the [`MutationSequencer`] guard.
pub(crate) async fn broadcast_best_effort(pusher: &dyn MessagePusher, event: BroadcastEvent) {
    match pusher.broadcast(&event).await {
        Ok(report) => {
            tracing::info!(
                "Broadcasted {:?} for message '{}' to {} connection(s)",
                event.kind,
                event.message.id,
                report.delivered
            );
            if !report.pruned.is_empty() {
                tracing::info!(
                    "Pruned {} dead connection(s) during broadcast",
                    report.pruned.len()
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                "Failed to broadcast {:?} for message '{}': {}",
                event.kind,
                event.message.id,
                e
            );
        }
    }
}
