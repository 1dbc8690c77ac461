//! MCP (Model Context Protocol) server for atomicwork-mcp.
//!
//! This crate implements the stdio MCP server that exposes read-only
//! Atomicwork ticket queries as tools to AI assistants.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use handlers::ToolHandler;
pub use server::McpServer;
