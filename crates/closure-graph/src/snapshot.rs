// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializable network state for session persistence and fingerprinting.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use blake3::Hash;
use ciborium::ser::into_writer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NetworkError;
use crate::ids::{ConnectionId, IdGenerator};
use crate::model::{Edge, ManualConnection, Node};
use crate::network::StreetNetwork;
use crate::processing::{ProcessingResult, SegmentProcessor};

/// Blake3 fingerprint of a snapshot's canonical bytes.
pub type Hash32 = [u8; 32];

/// Full network state. Nodes and edges are sorted by id; connections keep
/// insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    /// All nodes.
    pub nodes: Vec<Node>,
    /// All edges.
    pub edges: Vec<Edge>,
    /// Manual connections in insertion order.
    pub manual_connections: Vec<ManualConnection>,
    /// Network-level replaced street keys.
    pub replaced_segments: BTreeSet<String>,
    /// Street key to the connection recorded as replacing it.
    #[serde(default)]
    pub replacements: BTreeMap<String, ConnectionId>,
    /// Current batch result, if any.
    #[serde(default)]
    pub last_results: Option<ProcessingResult>,
}

impl NetworkSnapshot {
    /// Canonical CBOR encoding (nodes/edges re-sorted by id).
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, NetworkError> {
        let mut s = self.clone();
        s.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        s.edges.sort_by(|a, b| a.id.cmp(&b.id));
        let mut bytes = Vec::new();
        into_writer(&s, &mut bytes).map_err(|e| NetworkError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    /// Blake3 hash of the canonical form.
    pub fn compute_hash(&self) -> Result<Hash32, NetworkError> {
        let h: Hash = blake3::hash(&self.to_canonical_bytes()?);
        Ok(h.into())
    }
}

impl<G, P> StreetNetwork<G, P> {
    /// Capture the current state.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<Edge> = self.edges.values().cloned().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        NetworkSnapshot {
            nodes,
            edges,
            manual_connections: self.connections.clone(),
            replaced_segments: self.replaced_segments.clone(),
            replacements: self.replacements.clone(),
            last_results: self.last_results.clone(),
        }
    }
}

impl<G, P> StreetNetwork<G, P>
where
    G: IdGenerator,
    P: SegmentProcessor,
{
    /// Rebuild a network from `snapshot`.
    ///
    /// Adjacency is rebuilt by walking each connection's edges in path order,
    /// so it matches what the original construction produced. Edges not
    /// referenced by any connection are appended afterwards in id order.
    pub fn restore(snapshot: NetworkSnapshot, ids: G, processor: P) -> Result<Self, NetworkError> {
        let mut net = Self::with_parts(ids, processor);

        for node in snapshot.nodes {
            if net.nodes.contains_key(&node.id) {
                return Err(NetworkError::DuplicateNode(node.id));
            }
            net.nodes.insert(node.id.clone(), node);
        }

        let mut pending: HashMap<_, Edge> = HashMap::new();
        let mut listed = Vec::new();
        for edge in snapshot.edges {
            if pending.contains_key(&edge.id) {
                return Err(NetworkError::DuplicateEdge(edge.id));
            }
            listed.push(edge.id.clone());
            pending.insert(edge.id.clone(), edge);
        }

        let ordered: Vec<_> = snapshot
            .manual_connections
            .iter()
            .flat_map(|c| c.edges.iter().cloned())
            .chain(listed)
            .collect();
        for edge_id in ordered {
            let Some(edge) = pending.remove(&edge_id) else {
                continue;
            };
            net.adjacency
                .entry(edge.source.clone())
                .or_default()
                .push(edge.id.clone());
            net.adjacency
                .entry(edge.target.clone())
                .or_default()
                .push(edge.id.clone());
            net.edges.insert(edge.id.clone(), edge);
        }

        for connection in snapshot.manual_connections {
            if net.connection_index.contains_key(&connection.id) {
                return Err(NetworkError::DuplicateConnection(connection.id));
            }
            net.store_connection(connection);
        }
        net.replaced_segments = snapshot.replaced_segments;
        net.replacements = snapshot.replacements;
        net.last_results = snapshot.last_results;
        debug!(
            nodes = net.nodes.len(),
            edges = net.edges.len(),
            connections = net.connections.len(),
            "restored street network"
        );
        Ok(net)
    }
}
