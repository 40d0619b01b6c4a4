// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Street network builder with deterministic ids.

use std::collections::HashMap;

use closure_graph::{
    ConnectionId, NodeId, PlaceholderProcessor, Position, SegmentProcessor, SequentialIds,
    StreetNetwork,
};

/// Node prefix used by built networks.
pub const TEST_NODE_PREFIX: &str = "n";
/// Connection prefix used by built networks.
pub const TEST_CONNECTION_PREFIX: &str = "c";

/// Declarative setup for a [`StreetNetwork`] in tests.
///
/// Nodes are referred to by label; labels never registered with
/// [`node`](Self::node) resolve to an id the network has never seen, which is
/// how tests exercise skipped hops.
///
/// # Example
///
/// ```
/// use closure_dry_tests::NetworkBuilder;
///
/// let built = NetworkBuilder::new()
///     .node("a", [0.0, 0.0])
///     .node("b", [1.0, 1.0])
///     .trace("K Street NW", &["a", "b"])
///     .build();
/// assert_eq!(built.network.edges_len(), 1);
/// assert_eq!(built.connections[0].as_str(), "c1");
/// ```
#[derive(Debug, Default, Clone)]
pub struct NetworkBuilder {
    nodes: Vec<(String, Position)>,
    segments: Vec<String>,
    traces: Vec<Trace>,
}

#[derive(Debug, Clone)]
struct Trace {
    street_key: String,
    labels: Vec<String>,
    replace: bool,
}

/// A built network plus the ids it handed out.
#[derive(Debug)]
pub struct BuiltNetwork<P = PlaceholderProcessor> {
    /// The network.
    pub network: StreetNetwork<SequentialIds, P>,
    /// Node ids by label.
    pub nodes: HashMap<String, NodeId>,
    /// Connection ids in trace order (rejected traces are absent).
    pub connections: Vec<ConnectionId>,
}

impl<P> BuiltNetwork<P> {
    /// Id for `label`; unknown labels map to an id the network never issued.
    pub fn id(&self, label: &str) -> NodeId {
        self.nodes
            .get(label)
            .cloned()
            .unwrap_or_else(|| missing_node(label))
    }
}

fn missing_node(label: &str) -> NodeId {
    NodeId::new(format!("missing_{label}"))
}

impl NetworkBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under `label`.
    pub fn node(mut self, label: &str, at: Position) -> Self {
        self.nodes.push((label.to_owned(), at));
        self
    }

    /// Process `inputs` as a batch before any traces are added.
    pub fn segments(mut self, inputs: &[&str]) -> Self {
        self.segments.extend(inputs.iter().map(|s| (*s).to_owned()));
        self
    }

    /// Trace a manual connection through `labels`.
    pub fn trace(self, street_key: &str, labels: &[&str]) -> Self {
        self.push_trace(street_key, labels, false)
    }

    /// Trace a manual connection and mark `street_key` as replaced by it.
    pub fn trace_and_replace(self, street_key: &str, labels: &[&str]) -> Self {
        self.push_trace(street_key, labels, true)
    }

    fn push_trace(mut self, street_key: &str, labels: &[&str], replace: bool) -> Self {
        self.traces.push(Trace {
            street_key: street_key.to_owned(),
            labels: labels.iter().map(|s| (*s).to_owned()).collect(),
            replace,
        });
        self
    }

    /// Build with the placeholder processor.
    pub fn build(self) -> BuiltNetwork {
        self.build_with(PlaceholderProcessor)
    }

    /// Build with a custom segment processor.
    pub fn build_with<P: SegmentProcessor>(self, processor: P) -> BuiltNetwork<P> {
        let ids = SequentialIds::with_prefixes(TEST_NODE_PREFIX, TEST_CONNECTION_PREFIX);
        let mut network = StreetNetwork::with_parts(ids, processor);

        let mut nodes = HashMap::new();
        for (label, at) in self.nodes {
            let id = network.create_node(at);
            nodes.insert(label, id);
        }
        if !self.segments.is_empty() {
            network.process_segments(self.segments.as_slice());
        }

        let mut connections = Vec::new();
        for trace in self.traces {
            let path: Vec<NodeId> = trace
                .labels
                .iter()
                .map(|l| nodes.get(l).cloned().unwrap_or_else(|| missing_node(l)))
                .collect();
            if let Ok(id) = network.add_manual_connection(&trace.street_key, &path) {
                if trace.replace {
                    network.replace_disconnected_segments(&trace.street_key, &id);
                }
                connections.push(id);
            }
        }

        BuiltNetwork {
            network,
            nodes,
            connections,
        }
    }
}
