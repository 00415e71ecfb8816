use clap::{Parser, Subcommand};
use costwise::cli::{self, OutputFormat, ShareShape, StakeholderArg};
use costwise::error::{CostwiseError, CostwiseResult};
use costwise::types::CurrencyCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "costwise")]
#[command(about = "SaaS pricing and COGS calculator: margin, break-even, investor metrics.")]
#[command(long_about = "Costwise - SaaS pricing and COGS calculator

Computes cost breakdowns, gross margins, break-even points, and
investor-facing projections from a JSON cost-definition file.

COST FILE FORMAT:
  {
    \"variableCosts\": [
      {\"id\": \"tokens\", \"name\": \"API tokens\", \"unit\": \"1k tokens\",
       \"costPerUnit\": 0.03, \"usagePerCustomer\": 100, \"description\": \"\"}
    ],
    \"fixedCosts\": [
      {\"id\": \"hosting\", \"name\": \"Hosting\", \"monthlyCost\": 50, \"description\": \"\"}
    ]
  }

  Both keys are optional; invalid items are skipped with a warning as long
  as at least one item in the list is valid.

COMMANDS:
  calculate  - COGS breakdown and margin at a given price
  break-even - Customers needed to cover fixed costs
  investor   - ARR, valuation range, growth milestones
  validate   - Check cost files without calculating
  encode     - Report JSON to shareable token
  decode     - Shareable token back to report JSON
  share      - Build a shareable report URL

EXAMPLES:
  costwise calculate costs.json --customers 100 --price 29
  costwise break-even costs.json --price 29
  costwise investor costs.json --customers 100 --price 29 --growth-rate 0.1
  costwise decode eJxall... --format json

Docs: https://github.com/costwise/costwise")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the COGS breakdown and margin at a given price
    Calculate {
        /// Path to the cost-definition JSON file
        costs: PathBuf,

        /// Paying customer count
        #[arg(short = 'c', long)]
        customers: String,

        /// Monthly price per customer
        #[arg(short, long)]
        price: String,

        /// Display currency (MYR, USD, SGD, EUR, GBP, AUD)
        #[arg(long, default_value = "MYR")]
        currency: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Find the customer count where fixed costs are fully covered
    BreakEven {
        /// Path to the cost-definition JSON file
        costs: PathBuf,

        /// Monthly price per customer
        #[arg(short, long)]
        price: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Derive investor metrics: ARR, valuation range, milestones
    Investor {
        /// Path to the cost-definition JSON file
        costs: PathBuf,

        /// Current paying customer count
        #[arg(short = 'c', long)]
        customers: String,

        /// Monthly price per customer (also used as ARPU)
        #[arg(short, long)]
        price: String,

        /// Month-over-month customer growth rate (0.1 = 10%)
        #[arg(short, long, default_value_t = 0.1)]
        growth_rate: f64,

        /// Customer lifetime value, if known
        #[arg(long)]
        ltv: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate cost-definition files without calculating
    Validate {
        /// Path to cost-definition JSON file(s)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Encode a report JSON file into a shareable token
    Encode {
        /// Path to the report JSON file
        report: PathBuf,
    },

    /// Decode a shareable token back into a report
    Decode {
        /// The encoded report token
        token: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Build a shareable URL for a report
    Share {
        /// Path to the report JSON file
        report: PathBuf,

        /// Base URL of the hosted app
        #[arg(short, long, default_value = "https://costwise.app")]
        base_url: String,

        /// Audience the link is tailored for
        #[arg(short, long, value_enum, default_value_t = StakeholderArg::Investor)]
        stakeholder: StakeholderArg,

        /// URL shape to produce
        #[arg(long, value_enum, default_value_t = ShareShape::Inline)]
        shape: ShareShape,

        /// Report store file used for short-id links
        #[arg(long, default_value = ".costwise/reports.json")]
        store_path: PathBuf,
    },
}

fn main() -> CostwiseResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            costs,
            customers,
            price,
            currency,
            format,
        } => {
            let currency: CurrencyCode = currency.parse().map_err(CostwiseError::Parse)?;
            cli::calculate(costs, customers, price, currency, format)
        }

        Commands::BreakEven {
            costs,
            price,
            format,
        } => cli::break_even(costs, price, format),

        Commands::Investor {
            costs,
            customers,
            price,
            growth_rate,
            ltv,
            format,
        } => cli::investor(costs, customers, price, growth_rate, ltv, format),

        Commands::Validate { files } => cli::validate(files),

        Commands::Encode { report } => cli::encode_report(report),

        Commands::Decode { token, format } => cli::decode_report(token, format),

        Commands::Share {
            report,
            base_url,
            stakeholder,
            shape,
            store_path,
        } => cli::share(report, base_url, stakeholder.into(), shape, store_path),
    }
}
