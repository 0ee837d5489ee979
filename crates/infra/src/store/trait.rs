use std::sync::Arc;

use thiserror::Error;

/// Keyed store operation error.
///
/// These are **infrastructure errors** (IO, poisoned locks, unusable keys,
/// undecodable bytes) as opposed to domain errors. Absence of a key is never an error: reads
/// return `Ok(None)` and deletes return `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io failure for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored bytes are not text; the record itself is damaged.
    #[error("record under key '{key}' is not valid UTF-8: {source}")]
    Undecodable {
        key: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub fn undecodable(key: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::Undecodable {
            key: key.into(),
            source,
        }
    }
}

/// Persistent key -> text blob store.
///
/// ## Implementation Requirements
///
/// - `write` replaces any previous value atomically (readers see the old or the new blob, never a mix)
/// - values written must survive process restarts (except for test/dev backends)
/// - calls block until done; nothing is retried internally
pub trait KeyedStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `blob` under `key`, replacing any previous value.
    fn write(&self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// Remove `key`. Returns whether anything was removed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<S> KeyedStore for Arc<S>
where
    S: KeyedStore + ?Sized,
{
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        (**self).write(key, blob)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}
