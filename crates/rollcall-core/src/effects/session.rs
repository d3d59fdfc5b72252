//! Session store effect
//!
//! Replaces ad hoc browser key-value flags with a narrow get/set interface
//! over the one record each authenticated session owns.

use crate::identifiers::SessionId;
use crate::verification::VerificationRecord;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SessionStoreEffects: Send + Sync {
    /// Load the record for `session`, if one was saved
    async fn load_record(&self, session: SessionId) -> Result<Option<VerificationRecord>>;

    /// Persist the record for `session`, replacing any previous value
    async fn save_record(&self, session: SessionId, record: &VerificationRecord) -> Result<()>;

    /// Drop the record (logout). Returns whether one existed.
    async fn clear_record(&self, session: SessionId) -> Result<bool>;
}
