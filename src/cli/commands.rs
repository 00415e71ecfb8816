use std::path::{Path, PathBuf};

use clap::ValueEnum;
use colored::Colorize;
use serde_json::{json, Value};

use crate::core::{
    calculate_break_even_customers, calculate_cogs_breakdown, calculate_investor_metrics,
    calculate_margin_info,
};
use crate::error::{CostwiseError, CostwiseResult, ValidationError};
use crate::report::{self, ShareUrlShape};
use crate::types::{CurrencyCode, InvestorInputs, ReportData, StakeholderType};
use crate::validate::{parse_non_negative_integer, parse_positive_number, CostFile};

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored table
    Table,
    /// Machine-readable JSON
    Json,
}

/// Format a currency amount for display, trimming float noise.
fn format_money(currency: CurrencyCode, n: f64) -> String {
    let rounded = (n * 100.0).round() / 100.0;
    format!("{}{:.2}", currency.symbol(), rounded)
}

fn format_percent(n: f64) -> String {
    let rounded = (n * 100.0).round() / 100.0;
    format!("{rounded:.2}%")
}

/// Load and validate a cost-definition JSON file, printing dropped-item
/// warnings distinctly from fatal errors.
fn load_cost_file(path: &Path) -> CostwiseResult<CostFile> {
    let raw = std::fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&raw)?;
    let file = CostFile::from_value(&doc)?;
    print_warnings(&file.warnings);
    Ok(file)
}

fn print_warnings(warnings: &[ValidationError]) {
    for warning in warnings {
        eprintln!("{} {}", "⚠️  Skipped invalid item:".yellow(), warning);
    }
}

/// Execute the calculate command: COGS breakdown plus margin at a price.
pub fn calculate(
    costs: PathBuf,
    customers: String,
    price: String,
    currency: CurrencyCode,
    format: OutputFormat,
) -> CostwiseResult<()> {
    let customer_count = parse_non_negative_integer(&customers, "customers")?;
    let price = parse_positive_number(&price, "price")?;
    let file = load_cost_file(&costs)?;

    let breakdown =
        calculate_cogs_breakdown(&file.variable_costs, &file.fixed_costs, customer_count);
    let margin = calculate_margin_info(price, breakdown.total_cogs);
    let break_even =
        calculate_break_even_customers(breakdown.fixed_total, price, breakdown.variable_total);

    match format {
        OutputFormat::Json => {
            let out = json!({
                "breakdown": breakdown,
                "margin": margin,
                "breakEvenCustomers": break_even.as_option(),
                "currency": currency,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("{}", "💰 Costwise - COGS Breakdown".bold().green());
            println!("   File: {}", costs.display());
            println!("   Customers: {customer_count}\n");

            println!(
                "   Variable costs:     {}",
                format_money(currency, breakdown.variable_total).cyan()
            );
            println!(
                "   Fixed costs:        {}",
                format_money(currency, breakdown.fixed_total).cyan()
            );
            println!(
                "   Fixed per customer: {}",
                format_money(currency, breakdown.fixed_per_customer).cyan()
            );
            println!(
                "   Total COGS:         {}\n",
                format_money(currency, breakdown.total_cogs).bold().cyan()
            );

            let margin_str = format_percent(margin.margin);
            let margin_colored = match margin.status {
                crate::types::MarginStatus::Great => margin_str.green(),
                crate::types::MarginStatus::Ok => margin_str.yellow(),
                crate::types::MarginStatus::Low => margin_str.red(),
            };
            println!(
                "   At {} per customer:",
                format_money(currency, price).bold()
            );
            println!("   Gross margin: {}", margin_colored.bold());
            println!(
                "   Profit:       {}",
                format_money(currency, margin.profit).bold()
            );

            match break_even.as_option() {
                Some(n) => println!("   Break-even:   {} customers", n.to_string().bold()),
                None => println!(
                    "   Break-even:   {}",
                    "not achievable at this price".red().bold()
                ),
            }
        }
    }

    Ok(())
}

/// Execute the break-even command.
pub fn break_even(costs: PathBuf, price: String, format: OutputFormat) -> CostwiseResult<()> {
    let price = parse_positive_number(&price, "price")?;
    let file = load_cost_file(&costs)?;

    // Per-customer contribution uses the variable cost per customer; fixed
    // costs are covered by the contribution margin.
    let breakdown = calculate_cogs_breakdown(&file.variable_costs, &file.fixed_costs, 1);
    let result =
        calculate_break_even_customers(breakdown.fixed_total, price, breakdown.variable_total);

    match format {
        OutputFormat::Json => {
            let out = json!({
                "price": price,
                "fixedTotal": breakdown.fixed_total,
                "variableCostPerCustomer": breakdown.variable_total,
                "breakEvenCustomers": result.as_option(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("{}", "⚖️  Costwise - Break-Even Analysis".bold().green());
            println!("   File: {}\n", costs.display());
            match result.as_option() {
                Some(n) => {
                    println!(
                        "   Break-even point: {} customers",
                        n.to_string().bold().green()
                    );
                }
                None => {
                    println!(
                        "   {}",
                        "Break-even is not achievable: variable cost per customer meets or exceeds the price."
                            .red()
                            .bold()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Execute the investor command: derived metrics from the cost model plus
/// price, customer count, and growth assumptions.
pub fn investor(
    costs: PathBuf,
    customers: String,
    price: String,
    growth_rate: f64,
    ltv: Option<f64>,
    format: OutputFormat,
) -> CostwiseResult<()> {
    let paid_customers = parse_non_negative_integer(&customers, "customers")?;
    let price = parse_positive_number(&price, "price")?;
    if !(0.0..=10.0).contains(&growth_rate) {
        return Err(CostwiseError::Parse(format!(
            "growth-rate must be between 0 and 10 (got {growth_rate})"
        )));
    }
    let file = load_cost_file(&costs)?;

    let breakdown =
        calculate_cogs_breakdown(&file.variable_costs, &file.fixed_costs, paid_customers);
    let margin = calculate_margin_info(price, breakdown.total_cogs);
    let break_even =
        calculate_break_even_customers(breakdown.fixed_total, price, breakdown.variable_total);

    let mrr = price * paid_customers as f64;
    let metrics = calculate_investor_metrics(InvestorInputs {
        mrr,
        paid_customers,
        arpu: price,
        gross_margin: margin.margin,
        break_even_customers: break_even,
        monthly_growth_rate: growth_rate,
        ltv: ltv.unwrap_or(0.0),
    });

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        OutputFormat::Table => {
            let currency = CurrencyCode::default();
            println!("{}", "📈 Costwise - Investor Metrics".bold().green());
            println!("   File: {}\n", costs.display());
            println!("   MRR:  {}", format_money(currency, metrics.mrr).cyan());
            println!("   ARR:  {}", format_money(currency, metrics.arr).cyan());
            println!("   ARPU: {}\n", format_money(currency, metrics.arpu).cyan());
            println!(
                "   Valuation (5x/10x/15x ARR): {} / {} / {}\n",
                format_money(currency, metrics.valuation.valuation_low),
                format_money(currency, metrics.valuation.valuation_mid).bold(),
                format_money(currency, metrics.valuation.valuation_high),
            );
            match metrics.break_even_customers {
                Some(n) => {
                    println!("   Break-even customers: {n}");
                    println!(
                        "   Customers to break-even: {}",
                        metrics.customers_to_break_even
                    );
                    match metrics.months_to_break_even {
                        Some(m) => println!("   Months to break-even: {m}"),
                        None if metrics.customers_to_break_even == 0 => {
                            println!("   {}", "Already past break-even".green())
                        }
                        None => println!(
                            "   Months to break-even: {}",
                            "beyond 120-month horizon".yellow()
                        ),
                    }
                }
                None => println!(
                    "   {}",
                    "Break-even not achievable at current unit economics".red()
                ),
            }
            println!("\n   🎯 Milestones:");
            for milestone in &metrics.milestones {
                let reach = match (milestone.customers_needed, milestone.months_to_reach) {
                    (Some(c), Some(m)) => format!("{c} customers, ~{m} months"),
                    (Some(c), None) => format!("{c} customers, beyond horizon"),
                    (None, _) => "unreachable (no ARPU)".to_string(),
                };
                println!("      {:<10} {}", milestone.label, reach.cyan());
            }
        }
    }

    Ok(())
}

/// Execute the validate command over one or more cost files.
pub fn validate(files: Vec<PathBuf>) -> CostwiseResult<()> {
    let mut failures = 0usize;
    for path in &files {
        print!("{} ... ", path.display());
        let raw = std::fs::read_to_string(path)?;
        let doc: Value = serde_json::from_str(&raw)?;
        match CostFile::from_value(&doc) {
            Ok(file) => {
                println!("{}", "ok".green().bold());
                println!(
                    "   {} variable, {} fixed cost items",
                    file.variable_costs.len(),
                    file.fixed_costs.len()
                );
                print_warnings(&file.warnings);
            }
            Err(e) => {
                failures += 1;
                println!("{}", "failed".red().bold());
                eprintln!("   {e}");
            }
        }
    }

    if failures > 0 {
        return Err(CostwiseError::Parse(format!(
            "{failures} of {} file(s) failed validation",
            files.len()
        )));
    }
    Ok(())
}

/// Read a report JSON file, accepting the current shape strictly and known
/// legacy shapes permissively.
fn load_report_file(path: &Path) -> CostwiseResult<ReportData> {
    let raw = std::fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&raw)?;
    report::decode_safe(&doc).ok_or_else(|| {
        CostwiseError::Decode(format!("{} is not a valid report document", path.display()))
    })
}

/// Execute the encode command: report JSON file to shareable token.
pub fn encode_report(report_path: PathBuf) -> CostwiseResult<()> {
    let report = load_report_file(&report_path)?;
    let token = report::encode(&report)?;
    println!("{token}");
    Ok(())
}

/// Execute the decode command: shareable token back to report JSON.
pub fn decode_report(token: String, format: OutputFormat) -> CostwiseResult<()> {
    let report = report::decode(&token)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("{}", "📄 Costwise - Report".bold().green());
            println!("   Project:  {}", report.project_name.bold());
            println!("   Created:  {}", report.created_at);
            println!(
                "   Costs:    {} variable, {} fixed",
                report.state.variable_costs.len(),
                report.state.fixed_costs.len()
            );
            println!("   Price:    {}", report.state.selected_price);
            println!("   Customers: {}", report.state.customer_count);
            if !report.notes.is_empty() {
                println!("   Notes:");
                for (stakeholder, note) in &report.notes {
                    println!("      {}: {}", stakeholder.as_str().cyan(), note);
                }
            }
        }
    }
    Ok(())
}

/// URL shape selector for the share command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareShape {
    Short,
    Inline,
    Legacy,
}

/// Stakeholder selector for the share command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StakeholderArg {
    Investor,
    Cofounder,
    Team,
    Advisor,
}

impl From<StakeholderArg> for StakeholderType {
    fn from(arg: StakeholderArg) -> Self {
        match arg {
            StakeholderArg::Investor => StakeholderType::Investor,
            StakeholderArg::Cofounder => StakeholderType::Cofounder,
            StakeholderArg::Team => StakeholderType::Team,
            StakeholderArg::Advisor => StakeholderType::Advisor,
        }
    }
}

/// Execute the share command: produce a shareable URL for a report file.
pub fn share(
    report_path: PathBuf,
    base_url: String,
    stakeholder: StakeholderType,
    shape: ShareShape,
    store_path: PathBuf,
) -> CostwiseResult<()> {
    let report = load_report_file(&report_path)?;

    let url_shape = match shape {
        ShareShape::Short => {
            let store = report::ReportStore::with_path(store_path);
            let id = store.store(&report)?;
            ShareUrlShape::ShortId(id)
        }
        ShareShape::Inline => ShareUrlShape::Inline,
        ShareShape::Legacy => ShareUrlShape::Legacy,
    };

    let url = report::create_shareable_url(&base_url, &report, stakeholder, url_shape)?;
    println!("{url}");
    Ok(())
}
