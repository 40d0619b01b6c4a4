// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Batch processing of raw segment descriptions.
//!
//! Turning "Main Street from Cross1 to Cross2" into geometry is the job of
//! an external parser. The network only needs the outcome per input, so the
//! parser sits behind [`SegmentProcessor`]. [`PlaceholderProcessor`] is the
//! stand-in used until a real parser is plugged in: it records every input
//! as a failure.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geojson::Feature;
use crate::model::ManualConnection;

/// Error recorded by [`PlaceholderProcessor`] for every input.
pub const PLACEHOLDER_ERROR: &str =
    "Could not parse segment text. Expected format: 'Main Street from Cross1 to Cross2'";

/// Derive a street key from raw input: every character outside
/// `[A-Za-z0-9]` becomes `_`.
pub fn street_key_from_input(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// A segment description the parser could not resolve to map geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentFailure {
    /// Raw input, verbatim.
    #[serde(alias = "originalInput")]
    pub input: String,
    /// Street key used to correlate the failure with manual fixes.
    pub street_key: String,
    /// Human-readable reason.
    pub error: String,
}

impl SegmentFailure {
    /// Failure for `input` keyed by [`street_key_from_input`].
    pub fn new(input: &str, error: impl Into<String>) -> Self {
        Self {
            input: input.to_owned(),
            street_key: street_key_from_input(input),
            error: error.into(),
        }
    }
}

/// What a processor made of one input.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentOutcome {
    /// Placed and connected to the street network.
    Connected(Feature),
    /// Placed, but not connected to the surrounding network.
    Disconnected(Feature),
    /// Not placed at all.
    Failed(SegmentFailure),
}

/// Pluggable segment parser.
pub trait SegmentProcessor {
    /// Process one raw segment description.
    fn process(&self, input: &str) -> SegmentOutcome;
}

impl<F> SegmentProcessor for F
where
    F: Fn(&str) -> SegmentOutcome,
{
    fn process(&self, input: &str) -> SegmentOutcome {
        self(input)
    }
}

/// Records every input as a [`PLACEHOLDER_ERROR`] failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProcessor;

impl SegmentProcessor for PlaceholderProcessor {
    fn process(&self, input: &str) -> SegmentOutcome {
        SegmentOutcome::Failed(SegmentFailure::new(input, PLACEHOLDER_ERROR))
    }
}

/// Result of one batch run. Replaced wholesale by the next run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    /// Successfully placed segments, in input order.
    pub features: Vec<Feature>,
    /// Placed but disconnected segments, in input order.
    #[serde(default)]
    pub disconnected_features: Vec<Feature>,
    /// Failures, in input order.
    pub failures: Vec<SegmentFailure>,
    /// Street keys marked fixed for this batch.
    #[serde(default)]
    pub manually_fixed: BTreeSet<String>,
    /// Manual connections that existed when the batch ran.
    #[serde(default)]
    pub manual_connections: Vec<ManualConnection>,
}

impl ProcessingResult {
    /// Result carrying only the given success features.
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }
}

/// A batch's failures split by whether their street key has been replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailureReview<'a> {
    /// Failures still waiting for a manual fix, in input order.
    pub pending: Vec<&'a SegmentFailure>,
    /// Failures whose street key has been replaced, in input order.
    pub fixed: Vec<&'a SegmentFailure>,
}
