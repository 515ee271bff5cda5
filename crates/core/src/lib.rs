pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;

use rust_decimal::Decimal;
use std::sync::Arc;

use api::http::HttpBackend;
use api::report::{Report, ReportFormat, ReportKind};
use api::traits::{DashboardApi, FinanceApi, LoanApi, ReportApi};
use config::ClientConfig;
use errors::CoreError;
use models::{
    dashboard::DashboardDetails,
    finance::{FinanceSnapshot, NewExpense, NewInvestment},
    loan::{Loan, LoanBalance, LoanForm, LoanStatus},
    permission::{Action, AppModule, Permissions},
    query::{ListQuery, Page},
};
use services::{
    dashboard_service::DashboardService,
    finance_service::{FinanceBoard, FinanceService, RefreshOutcome},
    loan_service::LoanService,
    trend_service::TrendAggregator,
};

/// Main entry point for the Lendtrack core library.
///
/// Wraps the back-office API behind permission checks: every operation
/// verifies the caller's capability for its module before any request is
/// made. The permission set and the credentials inside the backend are both
/// supplied by the caller.
#[must_use]
pub struct LendTracker {
    permissions: Permissions,
    loans: LoanService,
    finance: FinanceBoard,
    dashboard: DashboardService,
    reports: Arc<dyn ReportApi>,
}

impl std::fmt::Debug for LendTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LendTracker")
            .field("permissions", &self.permissions)
            .field("has_finance_snapshot", &self.finance.current().is_some())
            .finish()
    }
}

impl LendTracker {
    /// Build a tracker talking to the REST API described by `config`.
    pub fn connect(config: &ClientConfig, permissions: Permissions) -> Result<Self, CoreError> {
        let backend = Arc::new(HttpBackend::new(config)?);
        Ok(Self::with_backends(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend,
            permissions,
        ))
    }

    /// Build a tracker over arbitrary backend implementations.
    pub fn with_backends(
        loans: Arc<dyn LoanApi>,
        finance: Arc<dyn FinanceApi>,
        dashboard: Arc<dyn DashboardApi>,
        reports: Arc<dyn ReportApi>,
        permissions: Permissions,
    ) -> Self {
        Self {
            permissions,
            loans: LoanService::new(loans),
            finance: FinanceBoard::new(FinanceService::new(finance)),
            dashboard: DashboardService::new(dashboard),
            reports,
        }
    }

    // ── Permissions ─────────────────────────────────────────────────

    #[must_use]
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Replace the capability set (e.g. after the user's role changed).
    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }

    fn require(&self, module: AppModule, action: Action) -> Result<(), CoreError> {
        if self.permissions.allows(module, action) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                module: module.to_string(),
                action: action.to_string(),
            })
        }
    }

    // ── Loans ───────────────────────────────────────────────────────

    pub async fn list_loans(&self, query: &ListQuery) -> Result<Page<Loan>, CoreError> {
        self.require(AppModule::Collection, Action::View)?;
        self.loans.list(query).await
    }

    pub async fn loan_details(&self, id: &str) -> Result<Loan, CoreError> {
        self.require(AppModule::Collection, Action::View)?;
        self.loans.details(id).await
    }

    pub async fn create_loan(&self, form: LoanForm) -> Result<(), CoreError> {
        self.require(AppModule::Collection, Action::Create)?;
        self.loans.create(form).await
    }

    pub async fn update_loan(&self, id: &str, form: LoanForm) -> Result<(), CoreError> {
        self.require(AppModule::Collection, Action::Update)?;
        self.loans.update(id, form).await
    }

    /// Open or close a loan. Returns the record as written.
    pub async fn set_loan_status(&self, id: &str, status: LoanStatus) -> Result<Loan, CoreError> {
        self.require(AppModule::Collection, Action::Update)?;
        self.loans.set_status(id, status).await
    }

    pub async fn delete_loan(&self, id: &str) -> Result<(), CoreError> {
        self.require(AppModule::Collection, Action::Delete)?;
        self.loans.delete(id).await
    }

    pub async fn add_installment(&self, id: &str, amount: Decimal) -> Result<(), CoreError> {
        self.require(AppModule::Collection, Action::Update)?;
        self.loans.add_installment(id, amount).await
    }

    /// Fetch the latest record and show what collecting `amount` would leave.
    pub async fn preview_installment(
        &self,
        id: &str,
        amount: Decimal,
    ) -> Result<LoanBalance, CoreError> {
        self.require(AppModule::Collection, Action::View)?;
        let loan = self.loans.details(id).await?;
        Ok(loan.balance().after_installment(amount))
    }

    pub async fn download_loan_report(&self, format: ReportFormat) -> Result<Report, CoreError> {
        self.require(AppModule::Collection, Action::View)?;
        self.reports.download_report(ReportKind::Loan, format).await
    }

    // ── Finance ─────────────────────────────────────────────────────

    /// Replace how the finance trend table is built (e.g. summing duplicate
    /// profit points instead of keeping the first). Applies from the next refresh.
    pub fn set_trend_aggregator(&mut self, aggregator: TrendAggregator) {
        self.finance.service_mut().set_aggregator(aggregator);
    }

    /// Re-fetch expenses, investments and profit, and recompute the trend table.
    pub async fn refresh_finance(&self) -> Result<RefreshOutcome, CoreError> {
        self.require(AppModule::Finance, Action::View)?;
        self.finance.refresh().await
    }

    /// Latest applied finance snapshot.
    #[must_use]
    pub fn finance_snapshot(&self) -> Option<Arc<FinanceSnapshot>> {
        self.finance.current()
    }

    /// Forget the finance snapshot and ignore any refresh still in flight.
    pub fn clear_finance(&self) {
        self.finance.clear();
    }

    pub async fn create_expense(&self, expense: NewExpense) -> Result<(), CoreError> {
        self.require(AppModule::Finance, Action::Create)?;
        self.finance.service().create_expense(expense).await
    }

    pub async fn create_investment(&self, investment: NewInvestment) -> Result<(), CoreError> {
        self.require(AppModule::Finance, Action::Create)?;
        self.finance.service().create_investment(investment).await
    }

    /// Expense, investment or profit export.
    pub async fn download_finance_report(
        &self,
        kind: ReportKind,
        format: ReportFormat,
    ) -> Result<Report, CoreError> {
        if kind == ReportKind::Loan {
            return Err(CoreError::ValidationError(
                "loan exports belong to the collection module".into(),
            ));
        }
        self.require(AppModule::Finance, Action::View)?;
        self.reports.download_report(kind, format).await
    }

    // ── Dashboard ───────────────────────────────────────────────────

    pub async fn dashboard(&self) -> Result<DashboardDetails, CoreError> {
        self.require(AppModule::Dashboard, Action::View)?;
        self.dashboard.details().await
    }
}
