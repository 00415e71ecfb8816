//! Costwise API Server binary
//!
//! HTTP REST API for SaaS pricing calculations.
//! Provides calculate, break-even, investor, and report endpoints.

use std::path::PathBuf;

use clap::Parser;
use costwise::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "costwise-server")]
#[command(version)]
#[command(about = "Costwise API Server - HTTP REST API for SaaS pricing and COGS calculations")]
#[command(long_about = r#"
Costwise API Server - HTTP REST API

Provides RESTful endpoints for all Costwise operations:
  - POST /api/v1/calculate      - COGS breakdown and margin at a price
  - POST /api/v1/break-even     - Break-even customer count
  - POST /api/v1/investor       - Investor metrics (ARR, valuation, milestones)
  - POST /api/v1/report/encode  - Encode a report into a shareable token
  - POST /api/v1/report/decode  - Decode a shareable token
  - POST /api/v1/report/store   - Store a report under a short id
  - GET  /api/v1/report/{id}    - Retrieve a stored report

Additional endpoints:
  - GET  /health                - Health check
  - GET  /version               - Server version info
  - GET  /                      - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - Tracing and structured logging

Example usage:
  costwise-server                           # Start on localhost:8080
  costwise-server --host 0.0.0.0 --port 3000
  costwise-server --store-path .costwise/reports.json

  curl -X POST http://localhost:8080/api/v1/break-even \
    -H "Content-Type: application/json" \
    -d '{"fixed_total": 75, "price": 29, "variable_cost_per_customer": 3.20}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "COSTWISE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "COSTWISE_PORT")]
    port: u16,

    /// File backing the short-id report store (omit for in-memory only)
    #[arg(long, env = "COSTWISE_STORE_PATH")]
    store_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        store_path: args.store_path,
    };

    run_api_server(config).await
}
