use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::dashboard::DashboardDetails;
use crate::models::finance::{Expense, Investment, NewExpense, NewInvestment, ProfitSummary};
use crate::models::loan::{InstallmentRequest, Loan, LoanForm};
use crate::models::query::{ListQuery, Page, PageRequest};

use super::report::{Report, ReportFormat, ReportKind};

/// Loan collection endpoints.
///
/// The HTTP backend implements this against the REST API; tests and
/// offline tools can plug in their own implementation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LoanApi: Send + Sync {
    /// One page of loans, filtered and sorted server-side.
    async fn list_loans(&self, query: &ListQuery) -> Result<Page<Loan>, CoreError>;

    async fn loan_details(&self, id: &str) -> Result<Loan, CoreError>;

    async fn create_loan(&self, form: &LoanForm) -> Result<(), CoreError>;

    async fn update_loan(&self, id: &str, form: &LoanForm) -> Result<(), CoreError>;

    async fn delete_loan(&self, id: &str) -> Result<(), CoreError>;

    /// Record a collected installment. The server updates the paid totals.
    async fn add_installment(
        &self,
        id: &str,
        request: &InstallmentRequest,
    ) -> Result<(), CoreError>;
}

/// Expense, investment and profit endpoints.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FinanceApi: Send + Sync {
    async fn list_expenses(&self, page: PageRequest) -> Result<Vec<Expense>, CoreError>;

    async fn list_investments(&self, page: PageRequest) -> Result<Vec<Investment>, CoreError>;

    async fn profit_summary(&self) -> Result<ProfitSummary, CoreError>;

    async fn create_expense(&self, expense: &NewExpense) -> Result<(), CoreError>;

    async fn create_investment(&self, investment: &NewInvestment) -> Result<(), CoreError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_details(&self) -> Result<DashboardDetails, CoreError>;
}

/// Server-rendered Excel / PDF exports.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ReportApi: Send + Sync {
    async fn download_report(
        &self,
        kind: ReportKind,
        format: ReportFormat,
    ) -> Result<Report, CoreError>;
}
