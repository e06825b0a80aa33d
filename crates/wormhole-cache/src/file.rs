use crate::backend::{decode, encode, CacheBackend, STORAGE_KEY};
use crate::error::{PersistenceError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;
use wormhole_core::UrlRecord;

/// Stores the record list as a JSON file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend storing `<dir>/shortenedUrls.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Creates a backend storing the list at exactly `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheBackend for FileBackend {
    fn load(&self) -> Result<Option<Vec<UrlRecord>>> {
        trace!(path = %self.path.display(), "Loading local cache file");

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(PersistenceError::Unavailable(format!(
                    "{}: {err}",
                    self.path.display()
                )))
            }
        };

        decode(&raw).map(Some)
    }

    fn save(&self, records: &[UrlRecord]) -> Result<()> {
        let raw = encode(records)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PersistenceError::Unavailable(format!("{}: {e}", parent.display()))
            })?;
        }

        std::fs::write(&self.path, raw)
            .map_err(|e| PersistenceError::Unavailable(format!("{}: {e}", self.path.display())))?;
        trace!(path = %self.path.display(), count = records.len(), "Wrote local cache file");
        Ok(())
    }
}
