// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem [`ConfigStore`] for street-closure tools.
//!
//! Each key is one `<key>.json` file under a base directory: the platform
//! config dir by default (`~/.config/street-closures` on Linux) or any
//! directory the caller picks. Writes go through a sibling temp file and a
//! rename so a crash never leaves half a settings file behind.

use closure_app_core::config::{ConfigError, ConfigStore};
use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON files under one directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Store under the platform config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("org", "dc-closures", "street-closures")
            .ok_or_else(|| ConfigError::Other("no home directory to hold settings".into()))?;
        Self::at(dirs.config_dir())
    }

    /// Store under `base`, created on demand.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        debug!(base = %base.display(), "settings directory ready");
        Ok(Self { base })
    }

    /// Directory holding the settings files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn file_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        let plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if plain {
            Ok(self.base.join(format!("{key}.json")))
        } else {
            Err(ConfigError::Other(format!("unusable settings key {key:?}")))
        }
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        fs::read(self.file_for(key)?).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io(err),
        })
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let target = self.file_for(key)?;
        let staging = target.with_extension("json.tmp");
        fs::create_dir_all(&self.base)?;
        fs::write(&staging, data)?;
        fs::rename(&staging, &target)?;
        debug!(path = %target.display(), bytes = data.len(), "settings file written");
        Ok(())
    }
}
