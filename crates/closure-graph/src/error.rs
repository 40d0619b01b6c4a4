// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for street network operations.

use thiserror::Error;

use crate::ids::{ConnectionId, EdgeId, NodeId};

/// Errors returned by [`StreetNetwork`](crate::StreetNetwork).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// A manual connection needs at least two nodes.
    #[error("cannot create manual connection: node path has {len} node(s), need at least 2")]
    PathTooShort {
        /// Length of the rejected path.
        len: usize,
    },
    /// A snapshot listed the same node twice.
    #[error("duplicate node in snapshot: {0}")]
    DuplicateNode(NodeId),
    /// A snapshot listed the same edge twice.
    #[error("duplicate edge in snapshot: {0}")]
    DuplicateEdge(EdgeId),
    /// A snapshot listed the same manual connection twice.
    #[error("duplicate manual connection in snapshot: {0}")]
    DuplicateConnection(ConnectionId),
    /// Canonical encoding failed.
    #[error("canonical encode failed: {0}")]
    Encode(String),
}
