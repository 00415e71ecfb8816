//! MCP server support

pub mod server;

pub use server::run_mcp_server_sync;
