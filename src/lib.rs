//! Costwise - SaaS pricing and COGS calculator
//!
//! This library computes unit economics for SaaS products: cost of goods sold
//! per customer, gross margin at a price point, break-even customer counts,
//! and investor-facing metrics (ARR, valuation ranges, milestone timelines).
//! Reports can be encoded into compressed URL-safe tokens for sharing.
//!
//! # Features
//!
//! - Variable and fixed cost modeling with tolerant JSON validation
//! - Gross margin and break-even analysis
//! - Investor metrics: ARR, revenue multiples, milestone projections
//! - Shareable report tokens (zlib + URL-safe base64)
//! - CLI, MCP server, and HTTP API frontends over the same core
//!
//! # Example
//!
//! ```
//! use costwise::core::{calculate_cogs_breakdown, calculate_margin_info};
//! use costwise::types::{FixedCostItem, VariableCostItem};
//!
//! let variable = vec![VariableCostItem {
//!     id: "tokens".to_string(),
//!     name: "LLM tokens".to_string(),
//!     unit: "1k tokens".to_string(),
//!     cost_per_unit: 0.03,
//!     usage_per_customer: 100.0,
//!     description: String::new(),
//! }];
//! let fixed = vec![FixedCostItem {
//!     id: "hosting".to_string(),
//!     name: "Hosting".to_string(),
//!     monthly_cost: 75.0,
//!     description: String::new(),
//! }];
//!
//! let breakdown = calculate_cogs_breakdown(&variable, &fixed, 100);
//! let margin = calculate_margin_info(29.0, breakdown.total_cogs);
//!
//! println!("COGS per customer: {:.2}", breakdown.total_cogs);
//! println!("Gross margin: {:.1}%", margin.margin);
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod mcp;
pub mod report;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use error::{CostwiseError, CostwiseResult, ValidationError};
pub use types::{
    CostBreakdown, CurrencyCode, FixedCostItem, InvestorMetrics, MarginInfo, ReportData,
    VariableCostItem,
};
