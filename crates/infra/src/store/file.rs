//! Directory-backed keyed store: one `<key>.json` file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::r#trait::{KeyedStore, StoreError};

const EXTENSION: &str = "json";
const TMP_SUFFIX: &str = ".tmp";

/// File-per-key store rooted at a directory.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write never leaves a truncated record behind.
/// The root directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys become file names, so anything that could escape the root is refused.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '%'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyedStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(key, e)),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::undecodable(key, e.utf8_error()))
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(key, e))?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, blob).map_err(|e| StoreError::io(key, e))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(key, e));
        }

        tracing::trace!(key, path = %path.display(), bytes = blob.len(), "blob written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // No directory yet means nothing has been written.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(StoreError::io("*", e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io("*", e))?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
