// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Settings persistence for street-closure tools.
//!
//! Front-ends never touch files directly: they hold a [`ConfigService`]
//! over some [`ConfigStore`] (filesystem in the CLI, in-memory in tests)
//! and exchange JSON-encoded values by key.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

/// Keyed blob storage behind a [`ConfigService`].
pub trait ConfigStore {
    /// Bytes stored under `key`, or [`ConfigError::NotFound`].
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace whatever is stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Why a settings value could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("config key not found")]
    NotFound,
    /// Backing storage failed.
    #[error("config storage failed: {0}")]
    Io(#[from] std::io::Error),
    /// Stored bytes are not the expected JSON.
    #[error("config value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store-specific failure.
    #[error("{0}")]
    Other(String),
}

/// JSON settings access over a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Decode the value under `key`. Absent keys and empty blobs both read
    /// as `Ok(None)`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => return Ok(None),
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => {
                debug!(key, "no stored settings");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Store `value` under `key` as indented JSON.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)?;
        debug!(key, bytes = data.len(), "settings saved");
        Ok(())
    }
}
