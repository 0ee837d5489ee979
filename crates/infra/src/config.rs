//! Configuration loading and representation.

use std::path::PathBuf;

use satchel_inventory::NewStackPolicy;

use crate::store::FileStore;

/// Directory holding persisted inventories.
pub const DATA_DIR_VAR: &str = "SATCHEL_DATA_DIR";
/// `requested` (default) or `single`, see [`NewStackPolicy`].
pub const NEW_STACK_POLICY_VAR: &str = "SATCHEL_NEW_STACK_POLICY";

const DEFAULT_DATA_DIR: &str = ".satchel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub new_stack_policy: NewStackPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            new_stack_policy: NewStackPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Missing or unusable values fall back to defaults with a warning; this
    /// never fails.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::with_overrides(None, None, lookup)
    }

    /// Like [`StoreConfig::from_lookup`], but explicit values win.
    ///
    /// A variable is only consulted (and only warned about) when its
    /// override is `None`.
    pub fn with_overrides<F>(
        data_dir: Option<PathBuf>,
        new_stack_policy: Option<NewStackPolicy>,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = data_dir
            .or_else(|| {
                lookup(DATA_DIR_VAR)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| {
                tracing::warn!(
                    "{DATA_DIR_VAR} not set; using {}",
                    defaults.data_dir.display()
                );
                defaults.data_dir
            });

        let new_stack_policy = new_stack_policy.unwrap_or_else(|| match lookup(NEW_STACK_POLICY_VAR) {
            None => defaults.new_stack_policy,
            Some(raw) => raw.parse::<NewStackPolicy>().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "{NEW_STACK_POLICY_VAR} ignored");
                defaults.new_stack_policy
            }),
        });

        Self {
            data_dir,
            new_stack_policy,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn open_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(StoreConfig::from_lookup(lookup(&[])), StoreConfig::default());
    }

    #[test]
    fn reads_both_variables() {
        let config = StoreConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/var/lib/satchel"),
            (NEW_STACK_POLICY_VAR, "single"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/satchel"));
        assert_eq!(config.new_stack_policy, NewStackPolicy::SingleUnit);
    }

    #[test]
    fn blank_dir_and_unknown_policy_fall_back() {
        let config = StoreConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "  "),
            (NEW_STACK_POLICY_VAR, "lots"),
        ]));
        assert_eq!(config, StoreConfig::default());
    }

    /// Runs `f` with a subscriber that records formatted events into a buffer.
    fn captured_logs(f: impl FnOnce()) -> String {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buffer {
            fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn explicit_values_win_without_consulting_the_environment() {
        let mut config = StoreConfig::default();
        let logs = captured_logs(|| {
            config = StoreConfig::with_overrides(
                Some(PathBuf::from("/srv/bags")),
                Some(NewStackPolicy::SingleUnit),
                lookup(&[
                    (DATA_DIR_VAR, "/var/lib/satchel"),
                    (NEW_STACK_POLICY_VAR, "lots"),
                ]),
            );
        });

        assert_eq!(config.data_dir, PathBuf::from("/srv/bags"));
        assert_eq!(config.new_stack_policy, NewStackPolicy::SingleUnit);
        assert!(!logs.contains("not set"), "unexpected warning: {logs}");
        assert!(!logs.contains("ignored"), "unexpected warning: {logs}");
    }

    #[test]
    fn missing_dir_without_override_still_warns() {
        let logs = captured_logs(|| {
            StoreConfig::with_overrides(None, None, lookup(&[]));
        });
        assert!(logs.contains("SATCHEL_DATA_DIR not set"), "logs: {logs}");
    }

    #[test]
    fn with_data_dir_overrides() {
        let config = StoreConfig::default().with_data_dir("/tmp/x");
        assert_eq!(config.open_store().root(), std::path::Path::new("/tmp/x"));
    }
}
