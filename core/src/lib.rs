//! Matching engine for `scoper`.
//!
//! [`engine::ScopeEngine`] is the entry point: build it from a
//! [`engine::ScopeSet`] (or raw rule lines) and hand it parsed targets.
//! [`database`] and [`sources`] supply those inputs.

pub mod database;
pub mod engine;
pub mod exclusion;
pub mod matcher;
pub mod sources;
