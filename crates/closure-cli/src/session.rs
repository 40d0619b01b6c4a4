// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session file: the street network persisted between CLI invocations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use closure_app_core::prefs::IdPrefs;
use closure_graph::{ClockIds, NetworkSnapshot, PlaceholderProcessor, StreetNetwork};
use tracing::debug;

/// Network type driven by the CLI.
pub type Network = StreetNetwork<ClockIds, PlaceholderProcessor>;

/// A session file on disk.
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the network, or start an empty one when the file does not exist.
    pub fn load(&self, ids: &IdPrefs) -> Result<Network> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no session yet; starting empty");
            return Ok(StreetNetwork::with_ids(ids.clock_ids()));
        }
        let bytes = fs::read(&self.path)
            .with_context(|| format!("read session {}", self.path.display()))?;
        let snapshot: NetworkSnapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse session {}", self.path.display()))?;
        StreetNetwork::restore(snapshot, ids.clock_ids(), PlaceholderProcessor)
            .with_context(|| format!("restore session {}", self.path.display()))
    }

    pub fn save(&self, network: &Network) -> Result<()> {
        let body = serde_json::to_vec_pretty(&network.snapshot()).context("encode session")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&self.path, body)
            .with_context(|| format!("write session {}", self.path.display()))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}
