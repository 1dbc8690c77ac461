//! Atomicwork service desk API client for atomicwork-mcp.
//!
//! This crate provides the HTTP request helper, the endpoint and filter-body
//! builders, and the ticket normalization used by the MCP tool handlers.

mod client;
pub mod endpoints;
mod types;

pub use client::AtomicworkClient;
pub use types::*;
