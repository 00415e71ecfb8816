//! COGS and margin arithmetic.
//!
//! Every function here is a pure, side-effect-free computation over validated
//! inputs. Non-finite numbers never appear in a result: the zero-customer and
//! zero-price cases have explicit policies instead of producing NaN/Infinity.

use serde::{Deserialize, Serialize};

use crate::types::{
    CostBreakdown, FixedCostItem, MarginHealth, MarginInfo, MarginStatus, VariableCostItem,
};

/// Margin classification thresholds, in percent.
///
/// Shipped defaults: >= 70 healthy, >= 50 acceptable, below that low.
/// Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginThresholds {
    pub healthy: f64,
    pub acceptable: f64,
}

impl Default for MarginThresholds {
    fn default() -> Self {
        Self {
            healthy: 70.0,
            acceptable: 50.0,
        }
    }
}

impl MarginHealth {
    /// Classify a margin percentage using the shipped default thresholds.
    pub fn classify(margin_percent: f64) -> Self {
        Self::classify_with(margin_percent, MarginThresholds::default())
    }

    pub fn classify_with(margin_percent: f64, thresholds: MarginThresholds) -> Self {
        if margin_percent >= thresholds.healthy {
            MarginHealth::Healthy
        } else if margin_percent >= thresholds.acceptable {
            MarginHealth::Acceptable
        } else {
            MarginHealth::Low
        }
    }
}

/// Break-even customer count, or unreachable when the contribution margin is
/// not positive. Modeled as a sum type so an infinite float never enters the
/// type system; serializes as the count or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreakEven {
    Customers(u64),
    // Untagged unit variant: serializes as JSON null.
    Unreachable,
}

impl BreakEven {
    /// `None` means unreachable.
    pub fn as_option(&self) -> Option<u64> {
        match self {
            BreakEven::Customers(n) => Some(*n),
            BreakEven::Unreachable => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, BreakEven::Unreachable)
    }
}

/// Compute the cost breakdown for a validated set of cost items.
///
/// `fixed_per_customer` is defined as 0 when `customer_count` is 0: with no
/// customers the per-customer allocation is undefined, and the system treats
/// fixed costs as absorbed elsewhere rather than propagating Infinity.
pub fn calculate_cogs_breakdown(
    variable_costs: &[VariableCostItem],
    fixed_costs: &[FixedCostItem],
    customer_count: u64,
) -> CostBreakdown {
    let variable_total: f64 = variable_costs.iter().map(|c| c.cost_per_customer()).sum();
    let fixed_total: f64 = fixed_costs.iter().map(|c| c.monthly_cost).sum();

    let fixed_per_customer = if customer_count == 0 {
        0.0
    } else {
        fixed_total / customer_count as f64
    };

    CostBreakdown {
        variable_total,
        fixed_total,
        fixed_per_customer,
        total_cogs: variable_total + fixed_per_customer,
    }
}

/// Gross margin percentage at a given price.
///
/// A non-positive price yields 0 rather than dividing by a non-positive
/// denominator. The result is not clamped and may be negative.
pub fn calculate_gross_margin(price: f64, cogs: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    ((price - cogs) / price) * 100.0
}

/// Minimum customers needed for fixed costs to be covered by the per-customer
/// contribution margin (price minus variable cost per customer).
pub fn calculate_break_even_customers(
    fixed_total: f64,
    price: f64,
    variable_cost_per_customer: f64,
) -> BreakEven {
    let contribution_margin = price - variable_cost_per_customer;
    if contribution_margin <= 0.0 {
        return BreakEven::Unreachable;
    }
    if fixed_total <= 0.0 {
        // Already profitable before the first customer.
        return BreakEven::Customers(0);
    }
    BreakEven::Customers((fixed_total / contribution_margin).ceil() as u64)
}

/// Margin, absolute profit, and display status at a price point.
pub fn calculate_margin_info(price: f64, total_cogs: f64) -> MarginInfo {
    let margin = calculate_gross_margin(price, total_cogs);
    let status = match MarginHealth::classify(margin) {
        MarginHealth::Healthy => MarginStatus::Great,
        MarginHealth::Acceptable => MarginStatus::Ok,
        MarginHealth::Low => MarginStatus::Low,
    };
    MarginInfo {
        margin,
        profit: price - total_cogs,
        status,
    }
}
