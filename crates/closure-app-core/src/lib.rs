// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for street-closure tools (config, prefs, export).
//! Keeps CLI/UI adapters thin and framework-agnostic.

pub mod config;
pub mod export;
pub mod prefs;
