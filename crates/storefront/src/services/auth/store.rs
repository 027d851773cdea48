//! Bearer token persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};

/// Where the session token lives between runs.
pub trait TokenStore: Send + Sync {
    /// Load the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be read.
    fn load(&self) -> std::io::Result<Option<SecretString>>;

    /// Persist `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn save(&self, token: &SecretString) -> std::io::Result<()>;

    /// Remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns error if the backing storage cannot be written.
    fn clear(&self) -> std::io::Result<()>;
}

impl<S: TokenStore + ?Sized> TokenStore for Arc<S> {
    fn load(&self) -> std::io::Result<Option<SecretString>> {
        (**self).load()
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        (**self).save(token)
    }

    fn clear(&self) -> std::io::Result<()> {
        (**self).clear()
    }
}

/// Process-local token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SecretString>> {
        // A poisoned slot still holds a usable value
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Whether a token is currently stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot().is_none()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> std::io::Result<Option<SecretString>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        *self.slot() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Token store backed by a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> std::io::Result<Option<SecretString>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_owned())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.expose_secret())
    }

    fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&SecretString::from("abc")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "abc");
        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!("minie-missing-{}", std::process::id()));
        let store = FileTokenStore::new(&path);
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_save_load_clear() {
        let dir = std::env::temp_dir().join(format!("minie-store-{}", std::process::id()));
        let store = FileTokenStore::new(dir.join("session"));
        store.save(&SecretString::from("tok.en.value")).unwrap();
        assert_eq!(
            store.load().unwrap().unwrap().expose_secret(),
            "tok.en.value"
        );
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        let _ = fs::remove_dir_all(dir);
    }
}
