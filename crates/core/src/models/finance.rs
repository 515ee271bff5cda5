use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trend::TrendTable;
use super::wire::{flexible_datetime, null_as_default};

/// A dated money amount; the common shape of expense and investment records
/// as far as trend aggregation is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedAmount {
    pub date: DateTime<Utc>,
    pub amount: Decimal,
}

impl DatedAmount {
    pub fn new(date: DateTime<Utc>, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// One point of the upstream profit summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitPoint {
    #[serde(deserialize_with = "flexible_datetime")]
    pub date: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub profit: Decimal,
}

impl ProfitPoint {
    pub fn new(date: DateTime<Utc>, profit: Decimal) -> Self {
        Self { date, profit }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Decimal,

    #[serde(deserialize_with = "flexible_datetime")]
    pub date: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl From<&Expense> for DatedAmount {
    fn from(e: &Expense) -> Self {
        DatedAmount::new(e.date, e.amount)
    }
}

/// Unit of an investment's lock-in period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationType {
    Month,
    Year,
}

impl std::fmt::Display for DurationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationType::Month => write!(f, "Month"),
            DurationType::Year => write!(f, "Year"),
        }
    }
}

impl std::str::FromStr for DurationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "months" => Ok(DurationType::Month),
            "year" | "years" => Ok(DurationType::Year),
            other => Err(format!("unknown duration type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Decimal,

    #[serde(deserialize_with = "flexible_datetime")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub duration_type: Option<DurationType>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_value: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl From<&Investment> for DatedAmount {
    fn from(i: &Investment) -> Self {
        DatedAmount::new(i.date, i.amount)
    }
}

/// Create payload for an expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
}

/// Create payload for an investment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub duration_type: DurationType,
    pub duration_value: u32,
    pub description: String,
}

/// Daily profit trend plus the server-computed grand total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_trend: Vec<ProfitPoint>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_profit: Decimal,
}

/// Headline figures of the finance page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinanceTotals {
    pub profit: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
}

impl FinanceTotals {
    /// Profit comes from the upstream summary; the other two are summed
    /// from the fetched lists.
    pub fn compute(expenses: &[Expense], investments: &[Investment], profit: &ProfitSummary) -> Self {
        Self {
            profit: profit.total_profit,
            expense: saturating_sum(expenses.iter().map(|e| e.amount)),
            investment: saturating_sum(investments.iter().map(|i| i.amount)),
        }
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Everything one finance fetch cycle produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceSnapshot {
    pub expenses: Vec<Expense>,
    pub investments: Vec<Investment>,
    pub profit: ProfitSummary,
    pub totals: FinanceTotals,
    pub trend: TrendTable,
}
