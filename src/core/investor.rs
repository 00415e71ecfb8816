//! Investor-facing projections built on top of the COGS engine's outputs.
//!
//! This module is a pure function of already-computed scalars: it never
//! re-derives cost data and never re-validates numeric ranges (the caller
//! validates per the schemas module).

use crate::core::cogs::BreakEven;
use crate::types::{InvestorInputs, InvestorMetrics, MarginHealth, Milestone, ValuationRange};

/// Months beyond which a compound-growth projection is reported as
/// unreachable rather than an arbitrarily large number.
pub const GROWTH_HORIZON_MONTHS: u32 = 120;

/// SaaS revenue multiples applied to ARR: conservative, typical, high-growth.
const VALUATION_MULTIPLES: (f64, f64, f64) = (5.0, 10.0, 15.0);

/// Target ARR ladder for milestone projections. A configuration table, not an
/// algorithm step: adjusting the ladder must not change any formula.
const MILESTONE_LADDER: [(&str, f64); 5] = [
    ("$10K ARR", 10_000.0),
    ("$50K ARR", 50_000.0),
    ("$100K ARR", 100_000.0),
    ("$500K ARR", 500_000.0),
    ("$1M ARR", 1_000_000.0),
];

/// Smallest `m >= 0` such that `current * (1 + growth_rate)^m >= target`,
/// capped at [`GROWTH_HORIZON_MONTHS`]. `None` when the target is not
/// reachable within the horizon.
pub fn months_to_reach(current: f64, target: f64, growth_rate: f64) -> Option<u32> {
    if current >= target {
        return Some(0);
    }
    // No base to compound from, or no growth: the target stays out of reach.
    if current <= 0.0 || growth_rate <= 0.0 {
        return None;
    }

    let mut projected = current;
    for month in 1..=GROWTH_HORIZON_MONTHS {
        projected *= 1.0 + growth_rate;
        if projected >= target {
            return Some(month);
        }
    }
    None
}

fn project_milestones(paid_customers: u64, arpu: f64, monthly_growth_rate: f64) -> Vec<Milestone> {
    MILESTONE_LADDER
        .iter()
        .map(|(label, target_arr)| {
            let customers_needed = if arpu > 0.0 {
                Some((target_arr / (12.0 * arpu)).ceil() as u64)
            } else {
                None
            };
            let months_to_reach = customers_needed.and_then(|needed| {
                months_to_reach(paid_customers as f64, needed as f64, monthly_growth_rate)
            });
            Milestone {
                label: (*label).to_string(),
                target_arr: *target_arr,
                customers_needed,
                months_to_reach,
            }
        })
        .collect()
}

/// Derive the full investor metrics block from pre-validated scalars.
pub fn calculate_investor_metrics(inputs: InvestorInputs) -> InvestorMetrics {
    let arr = inputs.mrr * 12.0;
    let (low, mid, high) = VALUATION_MULTIPLES;

    let (customers_to_break_even, months_to_break_even) = match inputs.break_even_customers {
        BreakEven::Unreachable => (0, None),
        BreakEven::Customers(break_even) => {
            let remaining = break_even.saturating_sub(inputs.paid_customers);
            let months = if remaining == 0 {
                // Already at or past break-even.
                None
            } else {
                months_to_reach(
                    inputs.paid_customers as f64,
                    break_even as f64,
                    inputs.monthly_growth_rate,
                )
            };
            (remaining, months)
        }
    };

    InvestorMetrics {
        mrr: inputs.mrr,
        arr,
        arpu: inputs.arpu,
        ltv: inputs.ltv,
        valuation: ValuationRange {
            valuation_low: arr * low,
            valuation_mid: arr * mid,
            valuation_high: arr * high,
        },
        gross_margin_health: MarginHealth::classify(inputs.gross_margin),
        break_even_customers: inputs.break_even_customers.as_option(),
        current_paid_customers: inputs.paid_customers,
        customers_to_break_even,
        months_to_break_even,
        milestones: project_milestones(
            inputs.paid_customers,
            inputs.arpu,
            inputs.monthly_growth_rate,
        ),
    }
}
