//! File-backed save target.

use async_trait::async_trait;
use noughts_core::{SessionError, Store};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Save file on disk.
///
/// Writes go to a sibling `.tmp` file first and are renamed over the
/// target, so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for `path`. Nothing is touched until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Store for FileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> Result<Vec<u8>, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                debug!(len = bytes.len(), "Read save file");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SessionError::PersistenceUnavailable),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }

    #[instrument(skip(self, bytes), fields(path = %self.path.display(), len = bytes.len()))]
    async fn write(&self, bytes: &[u8]) -> Result<(), SessionError> {
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        debug!("Wrote save file");
        Ok(())
    }
}
