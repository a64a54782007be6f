use async_trait::async_trait;
use thiserror::Error;

use videodrip_models::{
    session::{SessionMap, UserSession},
    user::UserId,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Stored sessions are malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Whole-set persistence of user sessions. Every call reads or writes the
/// complete mapping, there is no per-record access and no locking.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns an empty mapping when nothing was saved before.
    async fn load(&self) -> Result<SessionMap, StorageError>;
    async fn save(&self, sessions: &SessionMap) -> Result<(), StorageError>;
}

pub async fn get(
    store: &dyn SessionStore,
    user_id: &UserId,
) -> Result<Option<UserSession>, StorageError> {
    Ok(store.load().await?.remove(user_id))
}

/// Reads the full set, applies `f` to the record of `user_id` and writes the set back.
/// Nothing is written when the record does not exist.
pub async fn modify<F>(
    store: &dyn SessionStore,
    user_id: &UserId,
    f: F,
) -> Result<Option<UserSession>, StorageError>
where
    F: FnOnce(&mut UserSession) + Send,
{
    let mut sessions = store.load().await?;

    let Some(session) = sessions.get_mut(user_id) else {
        return Ok(None);
    };

    f(session);
    let updated = session.clone();
    store.save(&sessions).await?;

    Ok(Some(updated))
}
