//! Core error type, configuration, and API seam for atomicwork-mcp.
//!
//! This crate provides the foundational abstractions shared by the client and the MCP server.

pub mod api;
pub mod config;
pub mod error;

pub use api::{ApiRequest, HttpMethod, TicketApi};
pub use config::Config;
pub use error::{Error, Result};
