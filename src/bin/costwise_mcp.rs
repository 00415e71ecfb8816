//! Costwise MCP Server binary
//!
//! Model Context Protocol server for AI agent integration.
//! Run with: `costwise-mcp`
//!
//! Configure in Claude Code or other MCP clients:
//! ```json
//! {
//!   "mcpServers": {
//!     "costwise": {
//!       "command": "costwise-mcp"
//!     }
//!   }
//! }
//! ```

use costwise::mcp::run_mcp_server_sync;

fn main() {
    run_mcp_server_sync();
}
