use async_trait::async_trait;
use parking_lot::Mutex;
use revmix_core::SessionData;

use crate::{SessionStore, SessionStoreError};

/// Keeps the session in memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<SessionData>>,
}

impl MemorySessionStore {
    pub fn new(session: Option<SessionData>) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Option<SessionData> {
        self.session.lock().clone()
    }

    async fn save(&self, session: &SessionData) -> Result<(), SessionStoreError> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        self.session.lock().take();
        Ok(())
    }
}
