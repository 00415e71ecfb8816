//! Pure calculation engines: COGS/margin arithmetic and investor projections.

pub mod cogs;
pub mod investor;

pub use cogs::{
    calculate_break_even_customers, calculate_cogs_breakdown, calculate_gross_margin,
    calculate_margin_info, BreakEven, MarginThresholds,
};
pub use investor::{calculate_investor_metrics, months_to_reach, GROWTH_HORIZON_MONTHS};
