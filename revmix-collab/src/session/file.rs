use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use log::{debug, warn};
use revmix_core::SessionData;
use tokio::fs;

use crate::{SessionStore, SessionStoreError};

/// Keeps the session as a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Option<SessionData> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read session at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring corrupt session at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn save(&self, session: &SessionData) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, bytes).await?;

        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use revmix_core::SessionData;
    use serde_json::json;
    use tempfile::tempdir;

    use super::FileSessionStore;
    use crate::SessionStore;

    fn session() -> SessionData {
        serde_json::from_value(json!({
            "access_token": "token-1",
            "token_type": "bearer",
            "user": { "id": "u1" },
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn sessions_survive_a_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("revmix_session.json"));

        assert_eq!(store.load().await, None);

        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await, Some(session()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await, None);

        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_sessions_load_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("revmix_session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::new(path);
        assert_eq!(store.load().await, None);
    }
}
