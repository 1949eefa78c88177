use async_trait::async_trait;
use revmix_core::SessionData;
use thiserror::Error;

mod file;
mod memory;

pub use file::*;
pub use memory::*;

pub type BoxedSessionStore = Box<dyn SessionStore>;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Could not write session: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persists the one session the client holds, the way a browser keeps it under a storage key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session. A missing or unreadable blob is no session.
    async fn load(&self) -> Option<SessionData>;

    /// Replaces the stored session
    async fn save(&self, session: &SessionData) -> Result<(), SessionStoreError>;

    /// Removes the stored session, if any
    async fn clear(&self) -> Result<(), SessionStoreError>;

    fn boxed(self) -> BoxedSessionStore
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}
