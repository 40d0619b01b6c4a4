// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! ConfigService and prefs behavior against the in-memory store.

use closure_app_core::config::{ConfigError, ConfigService};
use closure_app_core::prefs::{ConfigPort, ToolPrefs, DEFAULT_EXPORT_FILE, PREFS_KEY};
use closure_dry_tests::{FailMode, InMemoryConfigStore};

#[test]
fn missing_and_empty_blobs_load_as_none() {
    let store = InMemoryConfigStore::with_blobs([("empty", Vec::<u8>::new())]);
    let service = ConfigService::new(store);
    assert!(service.load::<ToolPrefs>("absent").unwrap().is_none());
    assert!(service.load::<ToolPrefs>("empty").unwrap().is_none());
}

#[test]
fn prefs_round_trip_through_the_port() {
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store.clone());
    assert_eq!(service.load_prefs(), None);

    let mut prefs = ToolPrefs::default();
    prefs.export.file_name = "closures-2026.geojson".into();
    prefs.export.pretty = false;
    service.save_prefs(&prefs);

    assert_eq!(service.load_prefs(), Some(prefs.clone()));
    assert_eq!(store.decode::<ToolPrefs>(PREFS_KEY), Some(prefs));
}

#[test]
fn corrupt_blob_surfaces_serde_error_but_port_degrades_to_none() {
    let store = InMemoryConfigStore::with_blobs([(PREFS_KEY, b"{not json".to_vec())]);
    let service = ConfigService::new(store);
    assert!(matches!(
        service.load::<ToolPrefs>(PREFS_KEY),
        Err(ConfigError::Serde(_))
    ));
    assert_eq!(service.load_prefs(), None);
}

#[test]
fn store_failures_are_swallowed_by_the_port() {
    let store = InMemoryConfigStore::new();
    store.set_fail_mode(FailMode::Always);
    let service = ConfigService::new(store.clone());
    service.save_prefs(&ToolPrefs::default());
    assert_eq!(service.load_prefs(), None);
    assert_eq!((store.save_count(), store.load_count()), (1, 1));
    assert!(store.keys().is_empty());
}

#[test]
fn defaults_name_the_dc_export_file() {
    assert_eq!(ToolPrefs::default().export.file_name, DEFAULT_EXPORT_FILE);
    assert_eq!(DEFAULT_EXPORT_FILE, "dc-street-closures.geojson");
}
