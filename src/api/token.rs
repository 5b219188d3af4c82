//! Session token storage
//!
//! The backend hands out a token on login; every later request carries it in
//! the `X-Token` header. Stores keep exactly one token under [`TOKEN_KEY`].

use crate::error::Result;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "six-cities-token";

pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn save(&self, token: &str) -> Result<()>;

    fn drop_token(&self) -> Result<()>;
}

/// Token held for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn drop_token(&self) -> Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// Token persisted as `{"six-cities-token": "..."}` in a JSON file
#[derive(Debug, Clone)]
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

    /// A missing file or unparseable contents count as empty; any other
    /// read failure is an error so `save` never clobbers a file it could not read
    fn read_entries(&self) -> Result<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Ignoring malformed token file {}: {}", self.path.display(), err);
            Map::new()
        }))
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Could not read token file {}: {}", self.path.display(), err);
                return None;
            }
        };

        entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(&entries)?;
        debug!("Saved session token to {}", self.path.display());
        Ok(())
    }

    fn drop_token(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
            debug!("Removed session token from {}", self.path.display());
        }
        Ok(())
    }
}
