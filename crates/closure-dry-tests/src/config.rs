// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use closure_app_core::config::{ConfigError, ConfigStore};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Which store operations should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    /// Everything succeeds.
    #[default]
    Never,
    /// `load_raw` fails with `ConfigError::Other`.
    OnLoad,
    /// `save_raw` fails with `ConfigError::Other`.
    OnSave,
    /// Both operations fail.
    Always,
}

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share state, so a test can hand one clone to a
/// [`ConfigService`](closure_app_core::config::ConfigService) and inspect
/// the other.
///
/// # Example
///
/// ```
/// use closure_dry_tests::InMemoryConfigStore;
/// use closure_app_core::config::ConfigService;
/// use closure_app_core::prefs::{ConfigPort, ToolPrefs, PREFS_KEY};
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save_prefs(&ToolPrefs::default());
/// assert_eq!(store.save_count(), 1);
/// assert!(store.decode::<ToolPrefs>(PREFS_KEY).is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: BTreeMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    fail: FailMode,
}

impl InMemoryConfigStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `blobs`.
    pub fn with_blobs<K, V>(blobs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let store = Self::new();
        store.lock().data = blobs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Choose which operations fail from now on.
    pub fn set_fail_mode(&self, mode: FailMode) {
        self.lock().fail = mode;
    }

    /// Number of `load_raw` attempts, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().loads
    }

    /// Number of `save_raw` attempts, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().data.keys().cloned().collect()
    }

    /// Raw blob for `key`, bypassing counters and failure injection.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }

    /// Decode the JSON blob for `key`, if present and well-formed.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.raw(key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.loads += 1;
        if matches!(inner.fail, FailMode::OnLoad | FailMode::Always) {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.saves += 1;
        if matches!(inner.fail, FailMode::OnSave | FailMode::Always) {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn saves_and_loads_share_state_across_clones() {
        let a = InMemoryConfigStore::new();
        let b = a.clone();
        a.save_raw("k", b"v").unwrap();
        assert_eq!(b.load_raw("k").unwrap(), b"v");
        assert_eq!((b.save_count(), a.load_count()), (1, 1));
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryConfigStore::new();
        assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn failing_saves_count_but_store_nothing() {
        let store = InMemoryConfigStore::new();
        store.set_fail_mode(FailMode::OnSave);
        assert!(store.save_raw("k", b"v").is_err());
        assert_eq!(store.save_count(), 1);
        assert!(store.keys().is_empty());

        store.set_fail_mode(FailMode::Never);
        store.save_raw("k", b"v").unwrap();
        assert_eq!(store.keys(), ["k"]);
    }

    #[test]
    fn failing_loads_leave_data_intact() {
        let store = InMemoryConfigStore::with_blobs([("k", b"v".to_vec())]);
        store.set_fail_mode(FailMode::Always);
        assert!(matches!(store.load_raw("k"), Err(ConfigError::Other(_))));
        assert_eq!(store.raw("k").unwrap(), b"v");
    }
}
