// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GeoJSON export of the current street network state.

use closure_graph::{FeatureCollection, StreetNetwork};
use thiserror::Error;
use tracing::info;

use crate::prefs::ExportPrefs;

/// Why an export could not be produced.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No batch has been processed yet.
    #[error("No processed data to export. Process segments first.")]
    NoResults,
    /// The assembled collection is empty.
    #[error("No features to export")]
    NoFeatures,
    /// JSON encoding failed.
    #[error("Export error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A ready-to-write export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// GeoJSON text.
    pub body: String,
    /// Number of features in `body`.
    pub feature_count: usize,
    /// The collection that was encoded.
    pub collection: FeatureCollection,
}

impl ExportArtifact {
    /// Status line for the user.
    pub fn summary(&self) -> String {
        format!(
            "GeoJSON exported successfully with {} features",
            self.feature_count
        )
    }
}

/// Export the network against its current batch result.
pub fn export_geojson<G, P>(
    network: &StreetNetwork<G, P>,
    prefs: &ExportPrefs,
) -> Result<ExportArtifact, ExportError> {
    let collection = network.export_last_results().ok_or(ExportError::NoResults)?;
    if collection.is_empty() {
        return Err(ExportError::NoFeatures);
    }
    let body = if prefs.pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };
    let feature_count = collection.len();
    info!(features = feature_count, file = %prefs.file_name, "prepared GeoJSON export");
    Ok(ExportArtifact {
        file_name: prefs.file_name.clone(),
        body,
        feature_count,
        collection,
    })
}
