use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ClientError;

/// Key the bearer token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Where the session controller keeps its token between runs.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// A small JSON key-value file. Only [`TOKEN_KEY`] is touched; other keys
/// in the file are preserved.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.read_all()?.remove(TOKEN_KEY))
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        let mut entries = self.read_all()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_all(&entries)
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut entries = self.read_all()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let mut store = Self::new();
        store
            .entries
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .insert(TOKEN_KEY.to_string(), token.to_string());
        store
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.entries().get(TOKEN_KEY).cloned())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        self.entries()
            .insert(TOKEN_KEY.to_string(), token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        self.entries().remove(TOKEN_KEY);
        Ok(())
    }
}
