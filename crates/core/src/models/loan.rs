use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::wire::{null_as_default, optional_flexible_datetime};

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoanStatus {
    /// Still collecting installments
    #[default]
    Open,
    /// Fully collected or written off
    Closed,
}

impl LoanStatus {
    /// Case-insensitive parse. Blank or unknown input falls back to `Open`.
    pub fn normalize(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("closed") {
            LoanStatus::Closed
        } else {
            LoanStatus::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Open => "Open",
            LoanStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LoanStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LoanStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(LoanStatus::normalize).unwrap_or_default())
    }
}

/// Editable loan fields, used both for create and update payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanForm {
    pub name: String,
    pub phone: String,

    /// Amount the borrower must pay back in total
    #[serde(default, deserialize_with = "null_as_default")]
    pub loan_amount: Decimal,

    /// Amount actually handed to the borrower
    #[serde(default, deserialize_with = "null_as_default")]
    pub given_amount: Decimal,

    #[serde(default, deserialize_with = "null_as_default")]
    pub per_day_collection: Decimal,

    #[serde(default, deserialize_with = "null_as_default")]
    pub days_for_loan: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_due_installments: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_paid_installments: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_paid_loan: Decimal,

    #[serde(default, deserialize_with = "null_as_default")]
    pub remaining_loan: Decimal,

    #[serde(default, deserialize_with = "null_as_default")]
    pub adhar_card: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pan_card: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reference_by: String,

    #[serde(default)]
    pub status: LoanStatus,
}

impl LoanForm {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }
}

/// A loan record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(flatten)]
    pub form: LoanForm,

    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "optional_flexible_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// Balance figures derived from the paid and given amounts.
    pub fn balance(&self) -> LoanBalance {
        LoanBalance::from_form(&self.form)
    }

    pub fn is_open(&self) -> bool {
        self.form.status == LoanStatus::Open
    }
}

/// Body of an installment submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRequest {
    pub install_amount: Decimal,
}

/// Client-side view of how much of a loan has been collected.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanBalance {
    pub loan_amount: Decimal,
    pub given_amount: Decimal,
    pub paid: Decimal,
    pub paid_installments: u32,
    pub due_installments: u32,
}

impl LoanBalance {
    pub fn from_form(form: &LoanForm) -> Self {
        Self {
            loan_amount: form.loan_amount,
            given_amount: form.given_amount,
            paid: form.total_paid_loan,
            paid_installments: form.total_paid_installments,
            due_installments: form.total_due_installments,
        }
    }

    /// Amount still to be collected, never negative.
    pub fn outstanding(&self) -> Decimal {
        (self.loan_amount - self.paid).max(Decimal::ZERO)
    }

    /// What the lender earns if the loan is collected in full.
    pub fn expected_margin(&self) -> Decimal {
        self.loan_amount - self.given_amount
    }

    pub fn remaining_installments(&self) -> u32 {
        self.due_installments.saturating_sub(self.paid_installments)
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding().is_zero()
    }

    /// Balance after one more installment of `amount` is collected.
    pub fn after_installment(&self, amount: Decimal) -> Self {
        Self {
            paid: self.paid + amount,
            paid_installments: self.paid_installments.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Totals over a set of loans, the way the collection dashboard shows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanBookSummary {
    pub loan_count: usize,
    pub open_count: usize,
    pub closed_count: usize,
    pub total_loan_amount: Decimal,
    pub total_given_amount: Decimal,
    pub total_paid: Decimal,
    pub total_outstanding: Decimal,
}

impl LoanBookSummary {
    pub fn from_loans<'a>(loans: impl IntoIterator<Item = &'a Loan>) -> Self {
        loans.into_iter().fold(Self::default(), |mut acc, loan| {
            let balance = loan.balance();
            acc.loan_count += 1;
            match loan.form.status {
                LoanStatus::Open => acc.open_count += 1,
                LoanStatus::Closed => acc.closed_count += 1,
            }
            acc.total_loan_amount = acc.total_loan_amount.saturating_add(balance.loan_amount);
            acc.total_given_amount = acc.total_given_amount.saturating_add(balance.given_amount);
            acc.total_paid = acc.total_paid.saturating_add(balance.paid);
            acc.total_outstanding = acc.total_outstanding.saturating_add(balance.outstanding());
            acc
        })
    }
}
