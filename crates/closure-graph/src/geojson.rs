// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Minimal GeoJSON data model for the export path and map layers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ConnectionId;

/// A coordinate pair (`[longitude, latitude]` or an equivalent projected pair).
pub type Position = [f64; 2];

/// `properties.type` value carried by synthesized manual connection features.
pub const MANUAL_CONNECTION_TYPE: &str = "manual_connection";

/// Geometry object (`{"type": ..., "coordinates": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Single position.
    Point(Position),
    /// Ordered line through two or more positions.
    LineString(Vec<Position>),
    /// Several independent lines.
    MultiLineString(Vec<Vec<Position>>),
}

/// A geometry plus free-form properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// Feature geometry.
    pub geometry: Geometry,
    /// Feature properties (opaque for parser-produced features).
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Feature with an empty property map.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: Map::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// LineString feature for a traced manual connection.
    pub fn manual_connection(
        id: &ConnectionId,
        street_key: &str,
        coordinates: Vec<Position>,
    ) -> Self {
        Self::new(Geometry::LineString(coordinates))
            .with_property("id", id.as_str())
            .with_property("streetKey", street_key)
            .with_property("type", MANUAL_CONNECTION_TYPE)
    }

    /// String property lookup.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// `{"type": "FeatureCollection", "features": [...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    /// Member features, in output order.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
