// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted segment processor for tests that need parser successes.

use std::cell::RefCell;
use std::collections::HashMap;

use closure_graph::{
    Feature, Geometry, PlaceholderProcessor, Position, SegmentOutcome, SegmentProcessor,
};

/// Returns canned outcomes per input and falls back to
/// [`PlaceholderProcessor`] for anything unscripted. Records every input it
/// sees.
#[derive(Debug, Default)]
pub struct ScriptedProcessor {
    outcomes: HashMap<String, SegmentOutcome>,
    seen: RefCell<Vec<String>>,
}

impl ScriptedProcessor {
    /// Processor with no scripted inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `input` to produce a connected LineString through `line`.
    pub fn connected(mut self, input: &str, line: Vec<Position>) -> Self {
        self.outcomes.insert(
            input.to_owned(),
            SegmentOutcome::Connected(segment_feature(input, line)),
        );
        self
    }

    /// Script `input` to produce a disconnected LineString through `line`.
    pub fn disconnected(mut self, input: &str, line: Vec<Position>) -> Self {
        self.outcomes.insert(
            input.to_owned(),
            SegmentOutcome::Disconnected(segment_feature(input, line)),
        );
        self
    }

    /// Inputs processed so far, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.borrow().clone()
    }
}

/// Parser-style feature tagged with the input it came from.
pub fn segment_feature(input: &str, line: Vec<Position>) -> Feature {
    Feature::new(Geometry::LineString(line)).with_property("segment", input)
}

impl SegmentProcessor for ScriptedProcessor {
    fn process(&self, input: &str) -> SegmentOutcome {
        self.seen.borrow_mut().push(input.to_owned());
        self.outcomes
            .get(input)
            .cloned()
            .unwrap_or_else(|| PlaceholderProcessor.process(input))
    }
}
