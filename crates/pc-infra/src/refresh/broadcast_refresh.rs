use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use pc_core::ports::RecordRefreshPort;
use pc_core::RecordId;

/// Default number of buffered notifications per subscriber.
pub const DEFAULT_CAPACITY: usize = 16;

/// Publishes "record updated" notifications to every subscribed view.
///
/// Publishing with no subscriber is not an error: nothing is cached yet.
///
/// 记录更新通知（广播）。
#[derive(Debug, Clone)]
pub struct BroadcastRecordRefresh {
    sender: broadcast::Sender<RecordId>,
}

impl BroadcastRecordRefresh {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordId> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastRecordRefresh {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl RecordRefreshPort for BroadcastRecordRefresh {
    async fn notify_record_updated(&self, record_id: &RecordId) -> Result<()> {
        match self.sender.send(record_id.clone()) {
            Ok(receivers) => debug!(record_id = %record_id, receivers, "record refresh published"),
            Err(_) => debug!(record_id = %record_id, "record refresh published without subscribers"),
        }
        Ok(())
    }
}
