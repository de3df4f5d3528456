//! Persistent client-side state.
//!
//! A [`SessionStore`] is a small string key/value store holding the auth
//! token, the cached user, the server URL override and a few UI flags.
//! [`FileStore`] keeps it in a JSON file; [`MemoryStore`] keeps it in
//! process memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ClientError;
use crate::models::User;

/// Keys understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Token,
    User,
    ServerUrl,
    DarkMode,
    /// RFC 3339 timestamp of when the install prompt was dismissed.
    PwaInstallDismissed,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Token => "token",
            StoreKey::User => "user",
            StoreKey::ServerUrl => "server_url",
            StoreKey::DarkMode => "dark_mode",
            StoreKey::PwaInstallDismissed => "pwa_install_dismissed",
        }
    }
}

/// Key/value storage for client state.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: StoreKey) -> Result<Option<String>, ClientError>;

    fn set(&self, key: StoreKey, value: &str) -> Result<(), ClientError>;

    fn remove(&self, key: StoreKey) -> Result<(), ClientError>;

    fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.get(StoreKey::Token)?.filter(|t| !t.is_empty()))
    }

    /// The cached user. A corrupt entry reads as absent.
    fn cached_user(&self) -> Result<Option<User>, ClientError> {
        Ok(self
            .get(StoreKey::User)?
            .and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    fn save_session(&self, token: &str, user: &User) -> Result<(), ClientError> {
        self.set(StoreKey::Token, token)?;
        self.save_user(user)
    }

    fn save_user(&self, user: &User) -> Result<(), ClientError> {
        self.set(StoreKey::User, &serde_json::to_string(user)?)
    }

    /// Forget the credentials. UI preferences and the server URL stay.
    fn clear_session(&self) -> Result<(), ClientError> {
        self.remove(StoreKey::Token)?;
        self.remove(StoreKey::User)
    }

    fn dark_mode(&self) -> Result<bool, ClientError> {
        Ok(self.get(StoreKey::DarkMode)?.as_deref() == Some("true"))
    }

    fn set_dark_mode(&self, enabled: bool) -> Result<(), ClientError> {
        self.set(StoreKey::DarkMode, if enabled { "true" } else { "false" })
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, ClientError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), ClientError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.as_str(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), ClientError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key.as_str());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Store persisted as a flat JSON object. The file is rewritten on every
/// change; a missing file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Store(format!("{} is not valid JSON: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        std::fs::write(&self.path, bytes).map_err(|e| io_error(&self.path, e))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, ClientError> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        Ok(self.read_all()?.remove(key.as_str()))
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), ClientError> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut entries = self.read_all()?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: StoreKey) -> Result<(), ClientError> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut entries = self.read_all()?;
        if entries.remove(key.as_str()).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

fn poisoned() -> ClientError {
    ClientError::Store("store lock poisoned".to_string())
}

fn io_error(path: &Path, e: std::io::Error) -> ClientError {
    ClientError::Store(format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            household_id: None,
            allergies: vec![],
        }
    }

    #[test]
    fn clear_session_keeps_preferences() {
        let store = MemoryStore::new();
        store.save_session("tok", &user()).unwrap();
        store.set_dark_mode(true).unwrap();
        store.set(StoreKey::ServerUrl, "http://kitchen.local").unwrap();

        store.clear_session().unwrap();

        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.cached_user().unwrap(), None);
        assert!(store.dark_mode().unwrap());
        assert_eq!(
            store.get(StoreKey::ServerUrl).unwrap().as_deref(),
            Some("http://kitchen.local")
        );
    }

    #[test]
    fn corrupt_cached_user_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(StoreKey::User, "{not json").unwrap();
        assert_eq!(store.cached_user().unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        let store = FileStore::new(&path);
        assert_eq!(store.token().unwrap(), None);
        store.save_session("tok", &user()).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.token().unwrap().as_deref(), Some("tok"));
        assert_eq!(reopened.cached_user().unwrap(), Some(user()));

        reopened.clear_session().unwrap();
        assert_eq!(FileStore::new(&path).token().unwrap(), None);
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "garbage").unwrap();

        let err = FileStore::new(&path).get(StoreKey::Token).unwrap_err();
        assert!(matches!(err, ClientError::Store(_)));
    }
}
