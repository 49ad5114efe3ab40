//! Durable access-token storage.
//!
//! The backend's bearer token survives restarts in a plain file under the
//! platform data directory (`~/.local/share/raidloot/token` on Linux).
//! Tokens are opaque here; whatever the backend hands out is stored byte
//! for byte and attached to later requests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR: &str = "raidloot";
const TOKEN_FILE: &str = "token";

/// Failures while reading or writing the token file.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// The platform exposes no data directory to keep the token under.
    #[error("no platform data directory available")]
    NoDataDir,
    /// Filesystem failure at the given path.
    #[error("token file {path}: {source}")]
    Io {
        /// File or directory the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// File-backed storage for the backend access token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store under the platform data directory.
    pub fn new() -> Result<Self, TokenStoreError> {
        let base = dirs::data_local_dir().ok_or(TokenStoreError::NoDataDir)?;
        Ok(Self::at(base.join(APP_DIR).join(TOKEN_FILE)))
    }

    /// Store at an explicit path. Tests point this at a temporary
    /// directory.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. A missing file is simply no token.
    pub fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_owned();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Write the token, creating parent directories as needed. On Unix the
    /// file ends up readable by the owner only.
    pub fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| TokenStoreError::Io {
                path: parent.to_owned(),
                source,
            })?;
        }
        fs::write(&self.path, token).map_err(|source| self.io_error(source))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|source| self.io_error(source))?;
        }
        Ok(())
    }

    /// Delete the stored token. Clearing an absent token is fine.
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
