//! In-memory session store

use async_trait::async_trait;
use rollcall_core::effects::SessionStoreEffects;
use rollcall_core::{Result, SessionId, VerificationRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session records serialized as JSON under `SessionId::storage_key`
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStoreEffects for MemorySessionStore {
    async fn load_record(&self, session: SessionId) -> Result<Option<VerificationRecord>> {
        let data = self.data.read().await;
        match data.get(&session.storage_key()) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    async fn save_record(&self, session: SessionId, record: &VerificationRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        let mut data = self.data.write().await;
        data.insert(session.storage_key(), bytes);
        Ok(())
    }

    async fn clear_record(&self, session: SessionId) -> Result<bool> {
        let mut data = self.data.write().await;
        Ok(data.remove(&session.storage_key()).is_some())
    }
}
