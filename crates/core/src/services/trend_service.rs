use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::finance::{DatedAmount, Expense, Investment, ProfitPoint, ProfitSummary};
use crate::models::trend::{TrendLabel, TrendRow, TrendTable};

/// How to treat several profit points that fall on the same calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateProfitPolicy {
    /// Keep the first point in input order and ignore the rest.
    #[default]
    FirstWins,
    /// Add them up, so the date row agrees with the upstream total.
    Sum,
}

#[derive(Default)]
struct DayBucket {
    profit: Option<Decimal>,
    expense: Decimal,
    investment: Decimal,
}

/// Merges the profit, expense and investment series into one trend table.
///
/// Every input date is reduced to its UTC calendar date. The output has one
/// row per distinct date (newest first) followed by a single `Total` row;
/// dates with no record in any series never appear, and no records at all
/// yields an empty table. Sums saturate at the `Decimal` bounds rather than
/// overflow.
#[derive(Debug, Clone, Default)]
pub struct TrendAggregator {
    policy: DuplicateProfitPolicy,
}

impl TrendAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicateProfitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DuplicateProfitPolicy {
        self.policy
    }

    pub fn aggregate(
        &self,
        profit: &[ProfitPoint],
        expenses: &[DatedAmount],
        investments: &[DatedAmount],
    ) -> TrendTable {
        let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

        for point in profit {
            let day = days.entry(point.date.date_naive()).or_default();
            day.profit = match (day.profit, self.policy) {
                (Some(first), DuplicateProfitPolicy::FirstWins) => {
                    debug!(date = %point.date.date_naive(), "ignoring duplicate profit point");
                    Some(first)
                }
                (current, _) => Some(current.unwrap_or(Decimal::ZERO).saturating_add(point.profit)),
            };
        }
        for e in expenses {
            let day = days.entry(e.date.date_naive()).or_default();
            day.expense = day.expense.saturating_add(e.amount);
        }
        for i in investments {
            let day = days.entry(i.date.date_naive()).or_default();
            day.investment = day.investment.saturating_add(i.amount);
        }

        if days.is_empty() {
            return TrendTable::default();
        }

        let mut total = TrendRow::new(TrendLabel::Total, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        let mut rows = Vec::with_capacity(days.len() + 1);

        for (date, day) in days.into_iter().rev() {
            let row = TrendRow::new(
                TrendLabel::Date(date),
                day.profit.unwrap_or(Decimal::ZERO),
                day.expense,
                day.investment,
            );
            total.profit = total.profit.saturating_add(row.profit);
            total.expense = total.expense.saturating_add(row.expense);
            total.investment = total.investment.saturating_add(row.investment);
            rows.push(row);
        }
        rows.push(total);

        TrendTable::from_rows(rows)
    }

    /// Aggregate straight from the fetched API records.
    pub fn aggregate_records(
        &self,
        profit: &ProfitSummary,
        expenses: &[Expense],
        investments: &[Investment],
    ) -> TrendTable {
        let expenses: Vec<DatedAmount> = expenses.iter().map(DatedAmount::from).collect();
        let investments: Vec<DatedAmount> = investments.iter().map(DatedAmount::from).collect();
        self.aggregate(&profit.daily_trend, &expenses, &investments)
    }
}
