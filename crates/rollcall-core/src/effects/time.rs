//! Wall-clock effect used for record timestamps and freshness checks.

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Milliseconds since the Unix epoch
    async fn now_ms(&self) -> Result<u64>;
}
