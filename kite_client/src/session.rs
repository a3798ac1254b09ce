//! Local storage for the broker session token.
//!
//! The token is kept as a single opaque line in a file. There is no refresh:
//! once the broker expires it, calls fail until the user logs in again.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kite_common::{ProxyError, Result};

/// File-backed access token store.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn save(&self, access_token: &str) -> Result<()> {
        fs::write(&self.path, access_token.trim())?;
        Ok(())
    }

    /// Stored token, or `None` when nothing (or only whitespace) is stored.
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stored token or `MissingAccessToken`.
    pub fn require(&self) -> Result<String> {
        self.load()?.ok_or(ProxyError::MissingAccessToken)
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}
