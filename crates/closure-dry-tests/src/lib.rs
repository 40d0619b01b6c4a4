// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for street-closure crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`network`] - Street network builder with deterministic ids
//! - [`processor`] - Scripted segment processor

pub mod config;
pub mod network;
pub mod processor;

// Re-export commonly used items at crate root for convenience
pub use config::{FailMode, InMemoryConfigStore};
pub use network::{BuiltNetwork, NetworkBuilder, TEST_CONNECTION_PREFIX, TEST_NODE_PREFIX};
pub use processor::{segment_feature, ScriptedProcessor};
