//! Rave MCP server library.
//!
//! Exposes the JSON-RPC router ([`core::server`]) and the closed set of tools
//! ([`tools`]) so the binary and the integration tests share one code path.

pub mod core;
pub mod tools;
