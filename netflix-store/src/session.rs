//! Session cookie persistence.
//!
//! After a successful login the transport's cookies are saved so the next
//! run can bootstrap without submitting the password again.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{load_json, remove_file, save_json};

/// A saved session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// `Cookie` header value.
    pub cookies: String,
    /// When the session was saved.
    pub saved_at: DateTime<Utc>,
    /// Account email, if the session came from a password login.
    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("cookies", &"<redacted>")
            .field("saved_at", &self.saved_at)
            .field("email", &self.email)
            .finish()
    }
}

impl StoredSession {
    /// Creates a session stamped with the current time.
    pub fn new(cookies: impl Into<String>, email: Option<String>) -> Self {
        Self {
            cookies: cookies.into(),
            saved_at: Utc::now(),
            email,
        }
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session.
    ///
    /// A missing file is `None`. A corrupt file is logged and treated as
    /// missing so the caller falls back to a password login.
    pub async fn load(&self) -> Option<StoredSession> {
        match load_json::<StoredSession>(&self.path).await {
            Ok(session) if session.cookies.trim().is_empty() => {
                warn!(path = %self.path.display(), "Stored session has no cookies");
                None
            }
            Ok(session) => {
                debug!(path = %self.path.display(), saved_at = %session.saved_at, "Loaded session");
                Some(session)
            }
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    /// Saves a session with owner-only permissions.
    pub async fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        if session.cookies.trim().is_empty() {
            return Err(StoreError::InvalidSession("no cookies to save".to_string()));
        }
        save_json(&self.path, session).await?;
        info!(path = %self.path.display(), "Saved session");
        Ok(())
    }

    /// Deletes the session file.
    pub async fn clear(&self) -> Result<(), StoreError> {
        remove_file(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().await.is_none());

        let session = StoredSession::new("NetflixId=abc; SecureNetflixId=def", Some("a@b.c".into()));
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await, Some(session));

        store.clear().await.unwrap();
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        tokio::fs::write(store.path(), "{\"cookies\": 1}").await.unwrap();
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_cookies_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let err = store.save(&StoredSession::new("  ", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidSession(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_debug_redacts_cookies() {
        let session = StoredSession::new("NetflixId=secret", None);
        assert!(!format!("{session:?}").contains("secret"));
    }
}
