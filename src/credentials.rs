//! Bearer token storage
//!
//! The token is process-wide, read-mostly state: every request reads it at
//! the start, and only the login/logout flow writes it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ApiError;

pub trait CredentialStore: Send + Sync {
    /// Current unexpired token, if any
    fn token(&self) -> Option<String>;

    /// Store a token valid for `expiry_days`
    fn set_token(&self, value: &str, expiry_days: u32) -> Result<(), ApiError>;

    /// Forget the stored token
    fn clear(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredCredential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredCredential {
    pub fn new(token: &str, expiry_days: u32) -> Self {
        Self {
            token: token.to_string(),
            expires_at: Utc::now() + Duration::days(expiry_days as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Token kept in a JSON file between runs
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<StoredCredential>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let stored = serde_json::from_str(&content)
            .map_err(|e| ApiError::Credentials(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(stored))
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        match self.read() {
            Ok(Some(stored)) if !stored.is_expired() => Some(stored.token),
            Ok(Some(_)) => {
                debug!("Stored token at {} has expired", self.path.display());
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable credentials: {}", e);
                None
            }
        }
    }

    fn set_token(&self, value: &str, expiry_days: u32) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let stored = StoredCredential::new(value, expiry_days);
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        debug!("Stored token at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Token held only for the lifetime of the process
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            inner: RwLock::new(Some(StoredCredential::new(token, 1))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        let guard = self.inner.read().ok()?;
        guard
            .as_ref()
            .filter(|stored| !stored.is_expired())
            .map(|stored| stored.token.clone())
    }

    fn set_token(&self, value: &str, expiry_days: u32) -> Result<(), ApiError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| ApiError::Credentials(e.to_string()))?;
        *guard = Some(StoredCredential::new(value, expiry_days));
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| ApiError::Credentials(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("auth").join("token.json"));
        assert_eq!(store.token(), None);

        store.set_token("abc123", 7).unwrap();
        assert_eq!(store.token().as_deref(), Some("abc123"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_ignores_expired_token() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("token.json"));
        store.set_token("old", 0).unwrap();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileCredentialStore::new(path);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.token(), None);
        store.set_token("t1", 7).unwrap();
        assert_eq!(store.token().as_deref(), Some("t1"));
        store.clear().unwrap();
        assert_eq!(store.token(), None);

        let store = MemoryCredentialStore::with_token("seeded");
        assert_eq!(store.token().as_deref(), Some("seeded"));
    }
}
