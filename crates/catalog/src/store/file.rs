//! Directory-backed durable storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DurableBackend;
use crate::error::StoreError;

/// Persists each key as `<key>.json` inside a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a store directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    /// The store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }

    fn usage_bytes(&self) -> Result<u64, StoreError> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                total += fs::metadata(&path)?.len();
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("data")).unwrap();
        assert_eq!(backend.get("ecobloom_products").unwrap(), None);

        backend.set("ecobloom_products", "[]").unwrap();
        assert_eq!(backend.get("ecobloom_products").unwrap().as_deref(), Some("[]"));

        let reopened = FileBackend::open(dir.path().join("data")).unwrap();
        assert_eq!(reopened.get("ecobloom_products").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/ecobloom_products.json").exists());
    }

    #[test]
    fn test_usage_counts_json_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        backend.set("a", "1234").unwrap();
        backend.set("b", "56").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(backend.usage_bytes().unwrap(), 6);
    }
}
