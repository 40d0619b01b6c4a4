// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The street network store: nodes, edges, adjacency, manual connections
//! and replaced-segment bookkeeping.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::error::NetworkError;
use crate::geojson::{Feature, FeatureCollection, Position};
use crate::ids::{ClockIds, ConnectionId, EdgeId, IdGenerator, NodeId};
use crate::model::{Edge, ManualConnection, Node, UnresolvedHop};
use crate::processing::{
    FailureReview, PlaceholderProcessor, ProcessingResult, SegmentOutcome, SegmentProcessor,
};

/// Graph of user-placed nodes and manually traced connections.
///
/// Owns every node, edge and connection it creates. Ids come from the
/// injected [`IdGenerator`]; batch processing is delegated to the injected
/// [`SegmentProcessor`]. Nothing is ever removed except by [`reset`](Self::reset).
#[derive(Debug)]
pub struct StreetNetwork<G = ClockIds, P = PlaceholderProcessor> {
    pub(crate) ids: G,
    pub(crate) processor: P,
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) edges: HashMap<EdgeId, Edge>,
    pub(crate) adjacency: HashMap<NodeId, Vec<EdgeId>>,
    pub(crate) connections: Vec<ManualConnection>,
    pub(crate) connection_index: HashMap<ConnectionId, usize>,
    pub(crate) replaced_segments: BTreeSet<String>,
    pub(crate) replacements: BTreeMap<String, ConnectionId>,
    pub(crate) last_results: Option<ProcessingResult>,
}

impl StreetNetwork {
    /// Empty network with wall-clock ids and the placeholder processor.
    pub fn new() -> Self {
        Self::with_parts(ClockIds::new(), PlaceholderProcessor)
    }
}

impl Default for StreetNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> StreetNetwork<G>
where
    G: IdGenerator,
{
    /// Empty network using `ids` and the placeholder processor.
    pub fn with_ids(ids: G) -> Self {
        Self::with_parts(ids, PlaceholderProcessor)
    }
}

impl<G, P> StreetNetwork<G, P>
where
    G: IdGenerator,
    P: SegmentProcessor,
{
    /// Empty network with an explicit id generator and segment processor.
    pub fn with_parts(ids: G, processor: P) -> Self {
        Self {
            ids,
            processor,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            adjacency: HashMap::new(),
            connections: Vec::new(),
            connection_index: HashMap::new(),
            replaced_segments: BTreeSet::new(),
            replacements: BTreeMap::new(),
            last_results: None,
        }
    }

    /// Store a node at `coordinates` and return its fresh id.
    pub fn create_node(&mut self, coordinates: Position) -> NodeId {
        let id = self.ids.node_id();
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                coordinates,
            },
        );
        debug!(node = %id, ?coordinates, "created node");
        id
    }

    /// Stitch `node_path` into edges and store the result as a manual
    /// connection for `street_key`.
    ///
    /// Paths shorter than two nodes are rejected without touching any state.
    /// A hop whose endpoint is unknown is skipped and recorded in
    /// [`ManualConnection::unresolved_hops`]; the connection is still stored,
    /// even when no hop resolved at all.
    pub fn add_manual_connection(
        &mut self,
        street_key: &str,
        node_path: &[NodeId],
    ) -> Result<ConnectionId, NetworkError> {
        if node_path.len() < 2 {
            warn!(street_key, len = node_path.len(), "rejected manual connection: path too short");
            return Err(NetworkError::PathTooShort {
                len: node_path.len(),
            });
        }

        let connection_id = self.ids.connection_id();
        let mut edges = Vec::with_capacity(node_path.len() - 1);
        let mut unresolved_hops = Vec::new();

        for (index, pair) in node_path.windows(2).enumerate() {
            let (source, target) = (&pair[0], &pair[1]);
            let (Some(src), Some(dst)) = (self.nodes.get(source), self.nodes.get(target)) else {
                let missing: Vec<NodeId> = [source, target]
                    .into_iter()
                    .filter(|id| !self.nodes.contains_key(*id))
                    .cloned()
                    .collect();
                warn!(connection = %connection_id, index, ?missing, "skipped hop: node not found");
                unresolved_hops.push(UnresolvedHop {
                    index,
                    source: source.clone(),
                    target: target.clone(),
                    missing,
                });
                continue;
            };

            let edge = Edge {
                id: EdgeId::for_hop(&connection_id, index),
                source: source.clone(),
                target: target.clone(),
                coordinates: [src.coordinates, dst.coordinates],
                manual: true,
                street_key: street_key.to_owned(),
            };
            let edge_id = edge.id.clone();
            self.edges.insert(edge_id.clone(), edge);
            self.adjacency
                .entry(source.clone())
                .or_default()
                .push(edge_id.clone());
            self.adjacency
                .entry(target.clone())
                .or_default()
                .push(edge_id.clone());
            edges.push(edge_id);
        }

        let connection = ManualConnection {
            id: connection_id.clone(),
            street_key: street_key.to_owned(),
            node_path: node_path.to_vec(),
            edges,
            unresolved_hops,
        };
        info!(
            connection = %connection_id,
            street_key,
            edges = connection.edges.len(),
            unresolved = connection.unresolved_hops.len(),
            "created manual connection"
        );
        self.store_connection(connection);
        Ok(connection_id)
    }

    pub(crate) fn store_connection(&mut self, connection: ManualConnection) {
        if let Some(&slot) = self.connection_index.get(&connection.id) {
            self.connections[slot] = connection;
        } else {
            self.connection_index
                .insert(connection.id.clone(), self.connections.len());
            self.connections.push(connection);
        }
    }

    /// Mark `street_key` as superseded by a manual connection.
    ///
    /// The key goes into the network-level replaced set and, when a batch
    /// result exists, into that batch's `manually_fixed` set as well.
    /// `connection` is not validated; it is remembered as the key's latest
    /// replacement (see [`replacement_for`](Self::replacement_for)). Always
    /// returns `true`.
    pub fn replace_disconnected_segments(
        &mut self,
        street_key: &str,
        connection: &ConnectionId,
    ) -> bool {
        self.replaced_segments.insert(street_key.to_owned());
        if let Some(results) = self.last_results.as_mut() {
            results.manually_fixed.insert(street_key.to_owned());
        }
        self.replacements
            .insert(street_key.to_owned(), connection.clone());
        info!(street_key, connection = %connection, "marked street as replaced");
        true
    }

    /// Run every input through the segment processor and keep the outcome
    /// as the current batch result, replacing the previous one.
    #[instrument(skip_all, fields(inputs = segment_texts.len()))]
    pub fn process_segments<S>(&mut self, segment_texts: &[S]) -> &ProcessingResult
    where
        S: AsRef<str>,
    {
        let mut result = ProcessingResult {
            manually_fixed: self.replaced_segments.clone(),
            manual_connections: self.connections.clone(),
            ..ProcessingResult::default()
        };
        for text in segment_texts {
            match self.processor.process(text.as_ref()) {
                SegmentOutcome::Connected(feature) => result.features.push(feature),
                SegmentOutcome::Disconnected(feature) => {
                    result.disconnected_features.push(feature);
                }
                SegmentOutcome::Failed(failure) => result.failures.push(failure),
            }
        }
        info!(
            successful = result.features.len(),
            disconnected = result.disconnected_features.len(),
            failures = result.failures.len(),
            "processed segments"
        );
        &*self.last_results.insert(result)
    }
}

impl<G, P> StreetNetwork<G, P> {
    /// True if `street_key` is marked fixed in the current batch result or in
    /// the network-level replaced set.
    pub fn is_segment_replaced(&self, street_key: &str) -> bool {
        self.last_results
            .as_ref()
            .is_some_and(|r| r.manually_fixed.contains(street_key))
            || self.replaced_segments.contains(street_key)
    }

    /// Assemble the export collection: `results.features` first, then one
    /// LineString per manual connection (insertion order) whose resolved
    /// coordinates number at least two.
    pub fn export_features(&self, results: &ProcessingResult) -> FeatureCollection {
        let mut features = results.features.clone();
        features.extend(self.connections.iter().filter_map(|connection| {
            let line = self.connection_line(connection);
            (line.len() > 1)
                .then(|| Feature::manual_connection(&connection.id, &connection.street_key, line))
        }));
        FeatureCollection { features }
    }

    /// Export against the current batch result, if any.
    pub fn export_last_results(&self) -> Option<FeatureCollection> {
        self.last_results.as_ref().map(|r| self.export_features(r))
    }

    /// Coordinates of the connection's node path, skipping ids that do not
    /// resolve.
    pub fn connection_line(&self, connection: &ManualConnection) -> Vec<Position> {
        connection
            .node_path
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| n.coordinates))
            .collect()
    }

    /// Split a batch's failures into pending and fixed.
    pub fn review_failures<'a>(&self, results: &'a ProcessingResult) -> FailureReview<'a> {
        let (fixed, pending): (Vec<_>, Vec<_>) = results.failures.iter().partition(|f| {
            results.manually_fixed.contains(&f.street_key) || self.is_segment_replaced(&f.street_key)
        });
        FailureReview { pending, fixed }
    }

    /// Street keys with at least one manual connection, first-seen order.
    pub fn fixed_street_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.connections
            .iter()
            .map(|c| c.street_key.as_str())
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Connection id most recently passed to
    /// [`replace_disconnected_segments`](StreetNetwork::replace_disconnected_segments)
    /// for `street_key`.
    pub fn replacement_for(&self, street_key: &str) -> Option<&ConnectionId> {
        self.replacements.get(street_key)
    }

    /// Node lookup.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of stored nodes.
    pub fn nodes_len(&self) -> usize {
        self.nodes.len()
    }

    /// Edge lookup.
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Number of stored edges.
    pub fn edges_len(&self) -> usize {
        self.edges.len()
    }

    /// Edges touching `node`, in the order they were added.
    pub fn adjacent_edges(&self, node: &NodeId) -> &[EdgeId] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Connection lookup.
    pub fn manual_connection(&self, id: &ConnectionId) -> Option<&ManualConnection> {
        self.connection_index
            .get(id)
            .and_then(|&slot| self.connections.get(slot))
    }

    /// All connections in insertion order.
    pub fn manual_connections(&self) -> &[ManualConnection] {
        &self.connections
    }

    /// Network-level replaced street keys.
    pub fn replaced_segments(&self) -> &BTreeSet<String> {
        &self.replaced_segments
    }

    /// Current batch result, if a batch has run.
    pub fn last_results(&self) -> Option<&ProcessingResult> {
        self.last_results.as_ref()
    }

    /// Drop every node, edge, connection, replacement and batch result.
    /// The id generator and processor are kept.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjacency.clear();
        self.connections.clear();
        self.connection_index.clear();
        self.replaced_segments.clear();
        self.replacements.clear();
        self.last_results = None;
        debug!("street network reset");
    }
}
