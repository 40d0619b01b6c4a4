// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Entities stored by the street network.

use serde::{Deserialize, Serialize};

use crate::geojson::Position;
use crate::ids::{ConnectionId, EdgeId, NodeId};

/// A user-placed point. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Coordinates as given at creation.
    pub coordinates: Position,
}

/// One hop of a manual connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// `<connection>_edge_<hop>`.
    pub id: EdgeId,
    /// Start node.
    pub source: NodeId,
    /// End node.
    pub target: NodeId,
    /// Endpoint coordinates copied from the nodes when the edge was built.
    pub coordinates: [Position; 2],
    /// Authored by hand (always true for edges built here).
    pub manual: bool,
    /// Street the edge belongs to.
    pub street_key: String,
}

/// A hop that was skipped because an endpoint did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedHop {
    /// Zero-based hop index within the node path.
    pub index: usize,
    /// Start node id as given.
    pub source: NodeId,
    /// End node id as given.
    pub target: NodeId,
    /// The endpoint ids that were not found.
    pub missing: Vec<NodeId>,
}

/// A user-traced replacement path for a street key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualConnection {
    /// Connection identifier.
    pub id: ConnectionId,
    /// Street key this path replaces.
    pub street_key: String,
    /// Full node path as requested, including ids that failed to resolve.
    pub node_path: Vec<NodeId>,
    /// Edges actually built, in path order.
    pub edges: Vec<EdgeId>,
    /// Hops skipped during construction, in path order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_hops: Vec<UnresolvedHop>,
}

impl ManualConnection {
    /// Every consecutive pair in the node path produced an edge.
    pub fn is_fully_connected(&self) -> bool {
        self.unresolved_hops.is_empty() && self.edges.len() + 1 == self.node_path.len()
    }
}
