use async_trait::async_trait;
use tokio::sync::RwLock;

use videodrip_models::session::SessionMap;

use crate::{SessionStore, StorageError};

#[derive(Default)]
pub struct InMemorySessionStore {
    store: RwLock<SessionMap>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: SessionMap) -> Self {
        Self {
            store: RwLock::new(sessions),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self) -> Result<SessionMap, StorageError> {
        Ok(self.store.read().await.clone())
    }

    async fn save(&self, sessions: &SessionMap) -> Result<(), StorageError> {
        *self.store.write().await = sessions.clone();
        Ok(())
    }
}
