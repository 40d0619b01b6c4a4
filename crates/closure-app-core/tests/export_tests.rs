// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! GeoJSON export service.

use closure_app_core::export::{export_geojson, ExportError};
use closure_app_core::prefs::ExportPrefs;
use closure_dry_tests::{NetworkBuilder, ScriptedProcessor};
use closure_graph::FeatureCollection;

#[test]
fn export_without_a_batch_is_refused() {
    let built = NetworkBuilder::new()
        .node("a", [0.0, 0.0])
        .node("b", [1.0, 1.0])
        .trace("K Street NW", &["a", "b"])
        .build();
    let err = export_geojson(&built.network, &ExportPrefs::default()).unwrap_err();
    assert!(matches!(err, ExportError::NoResults));
    assert_eq!(
        err.to_string(),
        "No processed data to export. Process segments first."
    );
}

#[test]
fn export_of_only_failures_is_refused() {
    let built = NetworkBuilder::new().segments(&["A St", "B St"]).build();
    let err = export_geojson(&built.network, &ExportPrefs::default()).unwrap_err();
    assert!(matches!(err, ExportError::NoFeatures));
}

#[test]
fn export_combines_parsed_and_traced_segments() {
    let processor = ScriptedProcessor::new().connected("Main St", vec![[5.0, 5.0], [6.0, 6.0]]);
    let built = NetworkBuilder::new()
        .node("a", [0.0, 0.0])
        .node("b", [1.0, 1.0])
        .segments(&["Main St", "K Street NW"])
        .trace_and_replace("K_Street_NW", &["a", "b"])
        .build_with(processor);

    let artifact = export_geojson(&built.network, &ExportPrefs::default()).unwrap();
    assert_eq!(artifact.file_name, "dc-street-closures.geojson");
    assert_eq!(artifact.feature_count, 2);
    assert_eq!(
        artifact.summary(),
        "GeoJSON exported successfully with 2 features"
    );

    let parsed: FeatureCollection = serde_json::from_str(&artifact.body).unwrap();
    assert_eq!(parsed, artifact.collection);
    assert_eq!(parsed.features[0].property_str("segment"), Some("Main St"));
    assert_eq!(parsed.features[1].property_str("streetKey"), Some("K_Street_NW"));
    assert!(built.network.is_segment_replaced("K_Street_NW"));
}

#[test]
fn compact_export_is_single_line() {
    let built = NetworkBuilder::new()
        .node("a", [0.0, 0.0])
        .node("b", [1.0, 1.0])
        .segments(&["x"])
        .trace("K", &["a", "b"])
        .build();
    let prefs = ExportPrefs {
        file_name: "out.geojson".into(),
        pretty: false,
    };
    let artifact = export_geojson(&built.network, &prefs).unwrap();
    assert!(!artifact.body.contains('\n'));
    assert!(artifact.body.starts_with(r#"{"type":"FeatureCollection""#));
    assert_eq!(artifact.file_name, "out.geojson");
}
