// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences for street-closure tools (export + id generation).

use closure_graph::ids::{CONNECTION_PREFIX, NODE_PREFIX};
use closure_graph::ClockIds;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{ConfigService, ConfigStore};

/// Config key the preferences are stored under.
pub const PREFS_KEY: &str = "prefs";
/// File name offered for GeoJSON downloads.
pub const DEFAULT_EXPORT_FILE: &str = "dc-street-closures.geojson";

/// Saved preferences for a closure tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ToolPrefs {
    /// Export settings.
    pub export: ExportPrefs,
    /// Identifier prefixes.
    pub ids: IdPrefs,
}

/// GeoJSON export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPrefs {
    /// Suggested output file name.
    pub file_name: String,
    /// Indent the JSON output.
    pub pretty: bool,
}

impl Default for ExportPrefs {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE.to_owned(),
            pretty: true,
        }
    }
}

/// Prefixes used by wall-clock id generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdPrefs {
    /// Node id prefix.
    pub node_prefix: String,
    /// Manual connection id prefix.
    pub connection_prefix: String,
}

impl Default for IdPrefs {
    fn default() -> Self {
        Self {
            node_prefix: NODE_PREFIX.to_owned(),
            connection_prefix: CONNECTION_PREFIX.to_owned(),
        }
    }
}

impl IdPrefs {
    /// Wall-clock id generator using these prefixes.
    pub fn clock_ids(&self) -> ClockIds {
        ClockIds::new().with_prefixes(self.node_prefix.clone(), self.connection_prefix.clone())
    }
}

/// Config-facing port for loading/saving tool preferences.
pub trait ConfigPort {
    /// Load preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<ToolPrefs>;
    /// Persist preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ToolPrefs);
}

impl<S> ConfigPort for ConfigService<S>
where
    S: ConfigStore,
{
    fn load_prefs(&self) -> Option<ToolPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "could not load prefs");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ToolPrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            warn!(%err, "could not save prefs");
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_prefs_fill_in_defaults() {
        let prefs: ToolPrefs =
            serde_json::from_str(r#"{"export": {"pretty": false}}"#).unwrap();
        assert_eq!(prefs.export.file_name, DEFAULT_EXPORT_FILE);
        assert!(!prefs.export.pretty);
        assert_eq!(prefs.ids, IdPrefs::default());
    }

    #[test]
    fn clock_ids_use_configured_prefixes() {
        use closure_graph::IdGenerator;
        let prefs = IdPrefs {
            node_prefix: "pt_".into(),
            connection_prefix: "trace_".into(),
        };
        let mut ids = prefs.clock_ids();
        assert!(ids.node_id().as_str().starts_with("pt_"));
        assert!(ids.connection_id().as_str().starts_with("trace_"));
    }
}
