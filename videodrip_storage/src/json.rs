use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;

use videodrip_models::session::SessionMap;

use crate::{SessionStore, StorageError};

/// Keeps every session in a single JSON object keyed by user id.
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self) -> Result<SessionMap, StorageError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "No session file at {}, starting empty",
                    self.path.display()
                );
                return Ok(SessionMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            log::warn!("Session file {} is empty", self.path.display());
            return Ok(SessionMap::new());
        }

        Ok(serde_json::from_slice(&content)?)
    }

    async fn save(&self, sessions: &SessionMap) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(sessions)?;
        tokio::fs::write(&self.path, content).await?;

        log::debug!(
            "Saved {} sessions to {}",
            sessions.len(),
            self.path.display()
        );
        Ok(())
    }
}
