use std::path::PathBuf;

use crate::{config, error::SessionError, types::TokenRecord};

/// Stores the token record of the logged-in user between runs.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            path: Self::session_path(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<TokenRecord, SessionError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotLoggedIn);
            }
            Err(e) => return Err(SessionError::Io(e)),
        };

        Ok(serde_json::from_str(&content)?)
    }

    pub async fn persist(&self, record: &TokenRecord) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Forgets the session. Clearing an absent session is not an error.
    pub async fn clear(&self) -> Result<(), SessionError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn session_path() -> PathBuf {
        config::data_dir().join("session.json")
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
