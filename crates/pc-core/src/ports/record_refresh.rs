use anyhow::Result;
use async_trait::async_trait;

use crate::ids::RecordId;

/// Tells the surrounding record-display framework that cached fields of a
/// record are stale and should be re-read.
///
/// 通知记录缓存已过期。
#[async_trait]
pub trait RecordRefreshPort: Send + Sync {
    async fn notify_record_updated(&self, record_id: &RecordId) -> Result<()>;
}
