//! Core Server Framework Module
//!
//! This module contains the core server implementation including:
//! - server.rs: JSON-RPC router and STDIO transport loop
//! - config.rs: environment-driven configuration and the API key gate
//! - error.rs: error types for the transport and the map client

pub mod config;
pub mod error;
pub mod server;
