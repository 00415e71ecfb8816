//! Validation boundary for untrusted input.
//!
//! Everything entering the calculation engines (JSON files, CLI option
//! strings, MCP tool arguments, URL-decoded payloads) passes through here
//! first. Item validators return tagged results and never panic; collection
//! validators tolerate partial failure, failing only when every provided item
//! is invalid.

pub mod items;
pub mod scalars;

pub use items::{
    validate_fixed_cost_item, validate_fixed_costs, validate_variable_cost_item,
    validate_variable_costs, CostFile,
};
pub use scalars::{
    get_number_or_default, parse_non_negative_integer, parse_positive_integer,
    parse_positive_number, validate_ai_provider, validate_currency_code,
    validate_non_negative_number, validate_number, validate_positive_number,
};
