use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//==============================================================================
// Cost Items
//==============================================================================

/// A per-customer, usage-scaled cost driver (API tokens, storage GB, ...).
///
/// Per-customer contribution = `cost_per_unit * usage_per_customer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCostItem {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub cost_per_unit: f64,
    pub usage_per_customer: f64,
    #[serde(default)]
    pub description: String,
}

impl VariableCostItem {
    /// Cost contributed by one customer per billing period.
    pub fn cost_per_customer(&self) -> f64 {
        self.cost_per_unit * self.usage_per_customer
    }
}

/// A cost incurred once per billing period regardless of customer count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostItem {
    pub id: String,
    pub name: String,
    pub monthly_cost: f64,
    #[serde(default)]
    pub description: String,
}

//==============================================================================
// Derived Results
//==============================================================================

/// Immutable cost breakdown produced by the COGS engine.
///
/// All fields are finite and non-negative; `fixed_per_customer` is 0 when the
/// customer count is 0 (cost allocation undefined with no customers, treated
/// as fully absorbed elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub variable_total: f64,
    pub fixed_total: f64,
    pub fixed_per_customer: f64,
    pub total_cogs: f64,
}

/// Margin quality bands used across the margin and investor engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginHealth {
    Healthy,
    Acceptable,
    Low,
}

/// Coarse status attached to a `MarginInfo` for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginStatus {
    Great,
    Ok,
    Low,
}

/// Margin and absolute profit at a given price point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginInfo {
    /// Gross margin as a percentage. May be negative, never clamped.
    pub margin: f64,
    /// Absolute profit per customer (price minus COGS). May be negative.
    pub profit: f64,
    pub status: MarginStatus,
}

//==============================================================================
// Closed Enumerations
//==============================================================================

/// Supported display currencies. Never inferred, only validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyCode {
    #[default]
    MYR,
    USD,
    SGD,
    EUR,
    GBP,
    AUD,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 6] = [
        CurrencyCode::MYR,
        CurrencyCode::USD,
        CurrencyCode::SGD,
        CurrencyCode::EUR,
        CurrencyCode::GBP,
        CurrencyCode::AUD,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::MYR => "RM",
            CurrencyCode::USD => "$",
            CurrencyCode::SGD => "S$",
            CurrencyCode::EUR => "€",
            CurrencyCode::GBP => "£",
            CurrencyCode::AUD => "A$",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::MYR => "MYR",
            CurrencyCode::USD => "USD",
            CurrencyCode::SGD => "SGD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::AUD => "AUD",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MYR" => Ok(CurrencyCode::MYR),
            "USD" => Ok(CurrencyCode::USD),
            "SGD" => Ok(CurrencyCode::SGD),
            "EUR" => Ok(CurrencyCode::EUR),
            "GBP" => Ok(CurrencyCode::GBP),
            "AUD" => Ok(CurrencyCode::AUD),
            other => Err(format!(
                "unknown currency '{}', valid: MYR, USD, SGD, EUR, GBP, AUD",
                other
            )),
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI providers the surrounding app may talk to. Only the closed set is
/// accepted at the validation boundary; the chat clients themselves live
/// outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiProvider {
    Openai,
    Anthropic,
    Gemini,
    Openrouter,
}

impl AiProvider {
    pub const VALID_SET: &'static str = "openai, anthropic, gemini, openrouter";

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(AiProvider::Openai),
            "anthropic" => Some(AiProvider::Anthropic),
            "gemini" => Some(AiProvider::Gemini),
            "openrouter" => Some(AiProvider::Openrouter),
            _ => None,
        }
    }
}

/// Business category attached to a pricing snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    #[default]
    Saas,
    Ecommerce,
    Marketplace,
    Fintech,
    Agency,
    Other,
}

/// Pricing strategy for the modeled product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModelType {
    #[default]
    FlatRate,
    Tiered,
    PerSeat,
    UsageBased,
    Hybrid,
}

/// Audience a shared report is tailored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderType {
    Investor,
    Cofounder,
    Team,
    Advisor,
}

impl StakeholderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StakeholderType::Investor => "investor",
            StakeholderType::Cofounder => "cofounder",
            StakeholderType::Team => "team",
            StakeholderType::Advisor => "advisor",
        }
    }
}

//==============================================================================
// Pricing Snapshot (Report Codec Input)
//==============================================================================

/// A pricing tier as configured in the tier editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// A feature row in the tier comparison matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierFeature {
    pub id: String,
    pub name: String,
    /// Ids of the tiers that include this feature.
    #[serde(default)]
    pub tier_ids: Vec<String>,
}

/// Full application snapshot assembled by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingState {
    #[serde(default)]
    pub variable_costs: Vec<VariableCostItem>,
    #[serde(default)]
    pub fixed_costs: Vec<FixedCostItem>,
    #[serde(default)]
    pub customer_count: u64,
    #[serde(default)]
    pub selected_price: f64,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub tiers: Vec<PricingTier>,
    #[serde(default)]
    pub features: Vec<TierFeature>,
    /// Share of customers expected on each tier, keyed by tier id.
    #[serde(default)]
    pub tier_distribution: BTreeMap<String, f64>,
    /// Fraction of provisioned capacity actually used, in [0, 1].
    #[serde(default)]
    pub utilization_rate: f64,
    #[serde(default)]
    pub business_type: BusinessType,
    /// Classifier confidence for `business_type`, in [0, 1].
    #[serde(default)]
    pub business_type_confidence: f64,
    #[serde(default)]
    pub pricing_model: PricingModelType,
}

impl Default for PricingState {
    fn default() -> Self {
        Self {
            variable_costs: Vec::new(),
            fixed_costs: Vec::new(),
            customer_count: 0,
            selected_price: 0.0,
            currency: CurrencyCode::MYR,
            tiers: Vec::new(),
            features: Vec::new(),
            tier_distribution: BTreeMap::new(),
            utilization_rate: 0.0,
            business_type: BusinessType::Saas,
            business_type_confidence: 0.0,
            pricing_model: PricingModelType::FlatRate,
        }
    }
}

/// A shareable/exportable pricing report. Immutable once encoded; decoded
/// copies are independent of the live in-memory state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub project_name: String,
    /// RFC 3339 timestamp of report creation.
    pub created_at: String,
    pub state: PricingState,
    /// Free-text notes per stakeholder audience.
    #[serde(default)]
    pub notes: BTreeMap<StakeholderType, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_mockup: Option<String>,
}

//==============================================================================
// Investor Metrics
//==============================================================================

/// Pre-validated scalar inputs for the investor metrics engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestorInputs {
    pub mrr: f64,
    pub paid_customers: u64,
    pub arpu: f64,
    /// Gross margin percentage as produced by the COGS engine.
    pub gross_margin: f64,
    pub break_even_customers: crate::core::BreakEven,
    /// Month-over-month customer growth rate (0.05 = 5%).
    pub monthly_growth_rate: f64,
    pub ltv: f64,
}

/// Revenue-multiple valuation range. Monotone: low <= mid <= high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRange {
    pub valuation_low: f64,
    pub valuation_mid: f64,
    pub valuation_high: f64,
}

/// One growth milestone projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub label: String,
    pub target_arr: f64,
    /// None when ARPU <= 0 makes the milestone unreachable.
    pub customers_needed: Option<u64>,
    /// None when not reachable within the growth horizon.
    pub months_to_reach: Option<u32>,
}

/// Investor-facing projections derived from COGS engine outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorMetrics {
    pub mrr: f64,
    pub arr: f64,
    pub arpu: f64,
    pub ltv: f64,
    pub valuation: ValuationRange,
    pub gross_margin_health: MarginHealth,
    /// None means break-even is unreachable at current unit economics.
    pub break_even_customers: Option<u64>,
    pub current_paid_customers: u64,
    pub customers_to_break_even: u64,
    /// None when already past break-even or unreachable within the horizon.
    pub months_to_break_even: Option<u32>,
    pub milestones: Vec<Milestone>,
}
