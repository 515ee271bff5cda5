use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::null_as_default;

/// Landing-page figures returned by the dashboard endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: UserStats,

    #[serde(default, deserialize_with = "null_as_default")]
    pub finance: FinanceStats,

    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_trend: Vec<DailyTrendPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_loans: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_loan_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_given_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_remaining_loan: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_profit: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manual_profit: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub loan_profit: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_expense: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_investment: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_reserve_fund: Decimal,
}

impl FinanceStats {
    /// Investment figure including the reserve fund, as shown on the card.
    pub fn committed_capital(&self) -> Decimal {
        self.total_investment + self.total_reserve_fund
    }
}

/// A chart point. The date is kept as the server's label string since it
/// is only ever plotted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTrendPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profit: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expense: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub investment: Decimal,
}
