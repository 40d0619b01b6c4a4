// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Street network model for the closure mapping tool.
//!
//! A [`StreetNetwork`] stores the nodes a user places on the map, stitches
//! node paths into [`ManualConnection`]s that stand in for segments the
//! parser could not place, remembers which street keys have been replaced,
//! and assembles the GeoJSON [`FeatureCollection`] consumed by map layers and
//! export.
//!
//! # Modules
//!
//! - [`ids`] - Identifier newtypes and the [`IdGenerator`] port
//! - [`model`] - Nodes, edges, manual connections
//! - [`network`] - The [`StreetNetwork`] store
//! - [`processing`] - Batch processing behind [`SegmentProcessor`]
//! - [`geojson`] - Export data model
//! - [`snapshot`] - Session persistence and state fingerprints

pub mod error;
pub mod geojson;
pub mod ids;
pub mod model;
pub mod network;
pub mod processing;
pub mod snapshot;

pub use error::NetworkError;
pub use geojson::{Feature, FeatureCollection, Geometry, Position, MANUAL_CONNECTION_TYPE};
pub use ids::{ClockIds, ConnectionId, EdgeId, IdGenerator, NodeId, SequentialIds};
pub use model::{Edge, ManualConnection, Node, UnresolvedHop};
pub use network::StreetNetwork;
pub use processing::{
    street_key_from_input, FailureReview, PlaceholderProcessor, ProcessingResult,
    SegmentFailure, SegmentOutcome, SegmentProcessor, PLACEHOLDER_ERROR,
};
pub use snapshot::{Hash32, NetworkSnapshot};
