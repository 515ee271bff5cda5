//! Lendtrack command line client.
//!
//! # Usage
//!
//! ```bash
//! # List the second page of open loans matching "sun"
//! lendtrack loans list --search sun --page 2
//!
//! # Date-bucketed profit/expense/investment table, as CSV
//! lendtrack finance trend --csv
//!
//! # Record an expense
//! lendtrack finance add-expense --name Rent --amount 1200 --date 2024-03-01
//!
//! # Download the collection workbook
//! lendtrack report loan excel --out loans.xlsx
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lendtrack_core::api::report::{ReportFormat, ReportKind};
use lendtrack_core::config::ClientConfig;
use lendtrack_core::models::finance::{DurationType, NewExpense, NewInvestment};
use lendtrack_core::models::loan::LoanStatus;
use lendtrack_core::models::permission::Permissions;
use lendtrack_core::models::query::ListQuery;
use lendtrack_core::services::finance_service::RefreshOutcome;
use lendtrack_core::services::trend_service::{DuplicateProfitPolicy, TrendAggregator};
use lendtrack_core::LendTracker;

mod render;

#[derive(Parser)]
#[command(name = "lendtrack")]
#[command(about = "Loan collection and finance back-office client", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file (falls back to LENDTRACK_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON permission map keyed by module; defaults to full access
    #[arg(long, global = true)]
    permissions: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Loan collection
    Loans {
        #[command(subcommand)]
        command: LoanCommands,
    },

    /// Expenses, investments and the profit trend
    Finance {
        #[command(subcommand)]
        command: FinanceCommands,
    },

    /// Landing-page totals
    Dashboard,

    /// Download an Excel or PDF export
    Report {
        /// loan, expense, investment or profit
        kind: ReportKind,

        /// excel or pdf
        format: ReportFormat,

        /// Output path (defaults to the server's file name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LoanCommands {
    /// One page of loans
    List {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        per_page: u32,

        /// Field to sort by; repeat the default to flip direction
        #[arg(long)]
        sort: Option<String>,

        /// Only open or closed loans (all when omitted)
        #[arg(long)]
        status: Option<StatusArg>,
    },

    /// Full record and balance of a single loan
    Show { id: String },

    /// Collect an installment
    Installment {
        id: String,

        amount: Decimal,

        /// Only print the resulting balance
        #[arg(long)]
        dry_run: bool,
    },

    /// Open or close a loan
    Status { id: String, status: StatusArg },

    /// Delete a loan
    Delete { id: String },
}

#[derive(Subcommand)]
enum FinanceCommands {
    /// Profit, expense and investment per day with a Total row
    Trend {
        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,

        /// Add up several profit points on one date instead of keeping the first
        #[arg(long)]
        sum_duplicates: bool,
    },

    /// Record an expense
    AddExpense {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        amount: Decimal,

        /// YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Record an investment
    AddInvestment {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        amount: Decimal,

        /// YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,

        /// month or year
        #[arg(long, default_value = "month")]
        duration_type: DurationType,

        #[arg(long)]
        duration: u32,

        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Open,
    Closed,
}

impl From<StatusArg> for LoanStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => LoanStatus::Open,
            StatusArg::Closed => LoanStatus::Closed,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("reading config from {}", path.display()))?,
        None => ClientConfig::from_env().context("LENDTRACK_API_URL must be set without --config")?,
    };
    Ok(config)
}

fn load_permissions(path: Option<&PathBuf>) -> Result<Permissions> {
    let Some(path) = path else {
        return Ok(Permissions::full());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading permissions from {}", path.display()))?;
    serde_json::from_str(&raw).context("permission map must be JSON keyed by module")
}

async fn run_loans(tracker: &LendTracker, command: LoanCommands) -> Result<()> {
    match command {
        LoanCommands::List {
            search,
            page,
            per_page,
            sort,
            status,
        } => {
            let mut query = ListQuery::default()
                .with_search(search)
                .with_status(status.map(LoanStatus::from))
                .with_page(page, per_page);
            if let Some(field) = sort {
                let page_no = query.page_no;
                query.toggle_sort(&field);
                query.page_no = page_no;
            }
            let loans = tracker.list_loans(&query).await?;
            print!("{}", render::loan_page(&loans, &query));
        }
        LoanCommands::Show { id } => {
            let loan = tracker.loan_details(&id).await?;
            print!("{}", render::loan_details(&loan));
        }
        LoanCommands::Installment {
            id,
            amount,
            dry_run,
        } => {
            let after = tracker.preview_installment(&id, amount).await?;
            if !dry_run {
                tracker.add_installment(&id, amount).await?;
                info!(loan = %id, %amount, "installment recorded");
            }
            print!("{}", render::balance(&after));
        }
        LoanCommands::Status { id, status } => {
            let loan = tracker.set_loan_status(&id, status.into()).await?;
            println!("{} is now {}", loan.form.name, loan.form.status);
        }
        LoanCommands::Delete { id } => {
            tracker.delete_loan(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

async fn run_finance(tracker: &mut LendTracker, command: FinanceCommands) -> Result<()> {
    match command {
        FinanceCommands::Trend {
            csv,
            sum_duplicates,
        } => {
            if sum_duplicates {
                tracker.set_trend_aggregator(TrendAggregator::with_policy(
                    DuplicateProfitPolicy::Sum,
                ));
            }
            if let RefreshOutcome::Discarded = tracker.refresh_finance().await? {
                bail!("finance refresh was superseded");
            }
            let Some(snapshot) = tracker.finance_snapshot() else {
                bail!("no finance data loaded");
            };
            if csv {
                print!("{}", snapshot.trend.to_csv());
            } else {
                print!("{}", render::trend_table(&snapshot.trend));
                print!("{}", render::finance_totals(&snapshot.totals));
            }
        }
        FinanceCommands::AddExpense {
            name,
            amount,
            date,
            description,
        } => {
            tracker
                .create_expense(NewExpense {
                    name,
                    date,
                    amount,
                    description,
                })
                .await?;
            println!("Expense recorded");
        }
        FinanceCommands::AddInvestment {
            name,
            amount,
            date,
            duration_type,
            duration,
            description,
        } => {
            tracker
                .create_investment(NewInvestment {
                    name,
                    date,
                    amount,
                    duration_type,
                    duration_value: duration,
                    description,
                })
                .await?;
            println!("Investment recorded");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let permissions = load_permissions(cli.permissions.as_ref())?;
    debug!(base_url = %config.base_url, "connecting");
    let mut tracker = LendTracker::connect(&config, permissions)?;

    match cli.command {
        Commands::Loans { command } => run_loans(&tracker, command).await?,
        Commands::Finance { command } => run_finance(&mut tracker, command).await?,
        Commands::Dashboard => {
            let details = tracker.dashboard().await?;
            print!("{}", render::dashboard(&details));
        }
        Commands::Report { kind, format, out } => {
            let report = match kind {
                ReportKind::Loan => tracker.download_loan_report(format).await?,
                _ => tracker.download_finance_report(kind, format).await?,
            };
            let path = out.unwrap_or_else(|| PathBuf::from(&report.file_name));
            std::fs::write(&path, &report.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = report.bytes.len(), "report saved");
        }
    }

    Ok(())
}
