use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::api::traits::FinanceApi;
use crate::errors::CoreError;
use crate::models::finance::{FinanceSnapshot, FinanceTotals, NewExpense, NewInvestment};
use crate::models::query::PageRequest;
use crate::services::fetch_guard::FetchGeneration;
use crate::services::trend_service::TrendAggregator;

/// Expense / investment / profit workflows.
pub struct FinanceService {
    api: Arc<dyn FinanceApi>,
    aggregator: TrendAggregator,
}

impl FinanceService {
    pub fn new(api: Arc<dyn FinanceApi>) -> Self {
        Self::with_aggregator(api, TrendAggregator::new())
    }

    pub fn with_aggregator(api: Arc<dyn FinanceApi>, aggregator: TrendAggregator) -> Self {
        Self { api, aggregator }
    }

    pub fn aggregator(&self) -> &TrendAggregator {
        &self.aggregator
    }

    /// Swap the aggregator used by later snapshots.
    pub fn set_aggregator(&mut self, aggregator: TrendAggregator) {
        self.aggregator = aggregator;
    }

    /// Fetch the three series together and derive totals and the trend table.
    /// Any failed fetch fails the whole cycle.
    pub async fn snapshot(&self) -> Result<FinanceSnapshot, CoreError> {
        let (expenses, investments, profit) = futures::try_join!(
            self.api.list_expenses(PageRequest::FINANCE_BULK),
            self.api.list_investments(PageRequest::FINANCE_BULK),
            self.api.profit_summary(),
        )?;
        debug!(
            expenses = expenses.len(),
            investments = investments.len(),
            profit_points = profit.daily_trend.len(),
            "finance data fetched"
        );

        let totals = FinanceTotals::compute(&expenses, &investments, &profit);
        let trend = self.aggregator.aggregate_records(&profit, &expenses, &investments);

        Ok(FinanceSnapshot {
            expenses,
            investments,
            profit,
            totals,
            trend,
        })
    }

    pub async fn create_expense(&self, mut expense: NewExpense) -> Result<(), CoreError> {
        expense.name = expense.name.trim().to_string();
        validate_entry(&expense.name, expense.amount)?;
        self.api.create_expense(&expense).await?;
        info!(name = %expense.name, amount = %expense.amount, "expense added");
        Ok(())
    }

    pub async fn create_investment(&self, mut investment: NewInvestment) -> Result<(), CoreError> {
        investment.name = investment.name.trim().to_string();
        validate_entry(&investment.name, investment.amount)?;
        if investment.duration_value == 0 {
            return Err(CoreError::ValidationError(
                "investment duration must be greater than zero".into(),
            ));
        }
        self.api.create_investment(&investment).await?;
        info!(name = %investment.name, amount = %investment.amount, "investment added");
        Ok(())
    }
}

fn validate_entry(name: &str, amount: Decimal) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::ValidationError("name is required".into()));
    }
    if amount <= Decimal::ZERO {
        return Err(CoreError::ValidationError(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

/// Result of one [`FinanceBoard::refresh`].
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The fetched snapshot is now the current one.
    Applied(Arc<FinanceSnapshot>),
    /// A newer refresh started while this one was in flight; its result was dropped.
    Discarded,
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied(_))
    }
}

/// State holder for the finance page.
///
/// Owns the latest snapshot and replaces it as a whole on every refresh.
/// Overlapping refreshes are ordered by generation: only the most recently
/// started one may install its result.
pub struct FinanceBoard {
    service: FinanceService,
    generation: FetchGeneration,
    current: Mutex<Option<Arc<FinanceSnapshot>>>,
}

impl FinanceBoard {
    pub fn new(service: FinanceService) -> Self {
        Self {
            service,
            generation: FetchGeneration::new(),
            current: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &FinanceService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut FinanceService {
        &mut self.service
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, CoreError> {
        let ticket = self.generation.begin();
        let result = self.service.snapshot().await;

        let mut slot = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if !self.generation.is_current(ticket) {
            warn!(generation = ticket.generation(), "discarding stale finance refresh");
            return Ok(RefreshOutcome::Discarded);
        }

        let snapshot = Arc::new(result?);
        *slot = Some(Arc::clone(&snapshot));
        Ok(RefreshOutcome::Applied(snapshot))
    }

    /// The most recently applied snapshot, if any.
    pub fn current(&self) -> Option<Arc<FinanceSnapshot>> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drop the snapshot and retire any refresh still in flight.
    pub fn clear(&self) {
        self.generation.invalidate();
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
