use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::api::traits::LoanApi;
use crate::errors::CoreError;
use crate::models::loan::{InstallmentRequest, Loan, LoanForm, LoanStatus};
use crate::models::query::{ListQuery, Page};

/// Loan collection workflows: validation in front of the loan endpoints.
pub struct LoanService {
    api: Arc<dyn LoanApi>,
}

impl LoanService {
    pub fn new(api: Arc<dyn LoanApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Loan>, CoreError> {
        if query.page_no == 0 {
            return Err(CoreError::ValidationError("page number starts at 1".into()));
        }
        if query.page_count == 0 {
            return Err(CoreError::ValidationError("page size must be greater than zero".into()));
        }
        self.api.list_loans(query).await
    }

    pub async fn details(&self, id: &str) -> Result<Loan, CoreError> {
        let id = validate_id(id)?;
        self.api.loan_details(id).await
    }

    pub async fn create(&self, form: LoanForm) -> Result<(), CoreError> {
        let form = normalize_form(form)?;
        self.api.create_loan(&form).await?;
        info!(name = %form.name, "loan created");
        Ok(())
    }

    pub async fn update(&self, id: &str, form: LoanForm) -> Result<(), CoreError> {
        let id = validate_id(id)?;
        let form = normalize_form(form)?;
        self.api.update_loan(id, &form).await?;
        info!(loan = id, "loan updated");
        Ok(())
    }

    /// Fetch the latest record, flip its status and write it back.
    pub async fn set_status(&self, id: &str, status: LoanStatus) -> Result<Loan, CoreError> {
        let id = validate_id(id)?;
        let mut loan = self.api.loan_details(id).await?;
        loan.form.status = status;
        self.api.update_loan(id, &loan.form).await?;
        info!(loan = id, %status, "loan status changed");
        Ok(loan)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let id = validate_id(id)?;
        self.api.delete_loan(id).await?;
        info!(loan = id, "loan deleted");
        Ok(())
    }

    pub async fn add_installment(&self, id: &str, amount: Decimal) -> Result<(), CoreError> {
        let id = validate_id(id)?;
        if amount <= Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "installment amount must be positive, got {amount}"
            )));
        }
        self.api
            .add_installment(id, &InstallmentRequest { install_amount: amount })
            .await?;
        info!(loan = id, %amount, "installment recorded");
        Ok(())
    }
}

fn validate_id(id: &str) -> Result<&str, CoreError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CoreError::ValidationError("loan id must not be empty".into()));
    }
    if id.contains('/') || id.contains('?') || id.contains('#') {
        return Err(CoreError::ValidationError(format!("invalid loan id '{id}'")));
    }
    Ok(id)
}

/// Trim the contact fields and reject forms the server would store half-empty.
fn normalize_form(mut form: LoanForm) -> Result<LoanForm, CoreError> {
    form.name = form.name.trim().to_string();
    form.phone = form.phone.trim().to_string();
    if form.name.is_empty() || form.phone.is_empty() {
        return Err(CoreError::ValidationError("name and phone are required".into()));
    }

    for (field, value) in [
        ("loanAmount", form.loan_amount),
        ("givenAmount", form.given_amount),
        ("perDayCollection", form.per_day_collection),
        ("totalPaidLoan", form.total_paid_loan),
        ("remainingLoan", form.remaining_loan),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CoreError::ValidationError(format!(
                "{field} must not be negative, got {value}"
            )));
        }
    }
    Ok(form)
}
