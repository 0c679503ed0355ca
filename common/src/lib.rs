//! Shared models for `scoper`.
//!
//! Everything in here is pure parsing: turning recon output lines into
//! [`network::target::Target`]s and scope lines into
//! [`network::rule::ScopeRule`]s. Matching lives in `scoper-core`.

pub mod config;
pub mod error;
pub mod network;
