// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier newtypes and the id-generation port.
//!
//! Nodes and connections get ids from an injected [`IdGenerator`]. Edge ids
//! are never generated: they are derived from the owning connection id and
//! the hop index (`<connection>_edge_<i>`), so a connection's edges are
//! reproducible from the connection alone.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default prefix for node ids.
pub const NODE_PREFIX: &str = "manual_node_";
/// Default prefix for manual connection ids.
pub const CONNECTION_PREFIX: &str = "manual_connection_";
/// Exclusive upper bound of the random node-id suffix.
pub const NODE_SUFFIX_RANGE: u32 = 1000;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(
    /// Identifier of a user-placed node.
    NodeId
);
string_id!(
    /// Identifier of an edge inside a manual connection.
    EdgeId
);
string_id!(
    /// Identifier of a manual connection.
    ConnectionId
);

impl EdgeId {
    /// Derive the id of hop `index` (zero-based) of `connection`.
    pub fn for_hop(connection: &ConnectionId, index: usize) -> Self {
        Self(format!("{connection}_edge_{index}"))
    }
}

/// Id-generation port used by [`StreetNetwork`](crate::StreetNetwork).
///
/// Implementations must never hand out the same id twice over their lifetime.
pub trait IdGenerator {
    /// Allocate a fresh node id.
    fn node_id(&mut self) -> NodeId;
    /// Allocate a fresh manual connection id.
    fn connection_id(&mut self) -> ConnectionId;
}

/// Wall-clock ids: `<prefix><millis>` for connections and
/// `<prefix><millis>_<0..1000>` for nodes.
///
/// The millisecond stamp is strictly increasing per generator. A clock
/// reading that repeats (same millisecond) or runs backwards is bumped to
/// one past the last stamp issued.
#[derive(Debug, Clone)]
pub struct ClockIds {
    node_prefix: String,
    connection_prefix: String,
    last_millis: u64,
    rng: StdRng,
}

impl ClockIds {
    /// Generator with the default prefixes and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Generator whose random node suffixes come from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            node_prefix: NODE_PREFIX.to_owned(),
            connection_prefix: CONNECTION_PREFIX.to_owned(),
            last_millis: 0,
            rng,
        }
    }

    /// Replace the node and connection prefixes.
    pub fn with_prefixes(
        mut self,
        node_prefix: impl Into<String>,
        connection_prefix: impl Into<String>,
    ) -> Self {
        self.node_prefix = node_prefix.into();
        self.connection_prefix = connection_prefix.into();
        self
    }

    fn next_millis(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self.last_millis = now.max(self.last_millis.saturating_add(1));
        self.last_millis
    }
}

impl Default for ClockIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for ClockIds {
    fn node_id(&mut self) -> NodeId {
        let millis = self.next_millis();
        let salt = self.rng.gen_range(0..NODE_SUFFIX_RANGE);
        NodeId(format!("{}{millis}_{salt}", self.node_prefix))
    }

    fn connection_id(&mut self) -> ConnectionId {
        let millis = self.next_millis();
        ConnectionId(format!("{}{millis}", self.connection_prefix))
    }
}

/// Counter-backed ids (`<prefix><n>`, starting at 1). Deterministic, so
/// tests and scripted sessions can assert exact ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    node_prefix: String,
    connection_prefix: String,
    next_node: u64,
    next_connection: u64,
}

impl SequentialIds {
    /// Counters with the default prefixes.
    pub fn new() -> Self {
        Self::with_prefixes(NODE_PREFIX, CONNECTION_PREFIX)
    }

    /// Counters with custom prefixes.
    pub fn with_prefixes(
        node_prefix: impl Into<String>,
        connection_prefix: impl Into<String>,
    ) -> Self {
        Self {
            node_prefix: node_prefix.into(),
            connection_prefix: connection_prefix.into(),
            next_node: 1,
            next_connection: 1,
        }
    }

    /// Continue counting after already-issued ids (used when restoring a session).
    pub fn resume_after(mut self, nodes: u64, connections: u64) -> Self {
        self.next_node = self.next_node.max(nodes.saturating_add(1));
        self.next_connection = self.next_connection.max(connections.saturating_add(1));
        self
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn node_id(&mut self) -> NodeId {
        let n = self.next_node;
        self.next_node += 1;
        NodeId(format!("{}{n}", self.node_prefix))
    }

    fn connection_id(&mut self) -> ConnectionId {
        let n = self.next_connection;
        self.next_connection += 1;
        ConnectionId(format!("{}{n}", self.connection_prefix))
    }
}
