use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{ClientConfig, Credentials};
use crate::errors::CoreError;
use crate::models::dashboard::DashboardDetails;
use crate::models::finance::{Expense, Investment, NewExpense, NewInvestment, ProfitSummary};
use crate::models::loan::{InstallmentRequest, Loan, LoanForm};
use crate::models::query::{ListQuery, Page, PageRequest};

use super::envelope::{
    error_message, unwrap_data, unwrap_record, ExpenseList, InvestmentList, ListEnvelope,
};
use super::report::{Report, ReportFormat, ReportKind};
use super::traits::{DashboardApi, FinanceApi, LoanApi, ReportApi};

/// REST backend for the back-office API over reqwest.
///
/// - JSON in, JSON out (camelCase bodies)
/// - `Authorization: Bearer` on every request when credentials are configured
/// - Non-2xx responses become [`CoreError::Api`], carrying the server's
///   `message` when it sent one
pub struct HttpBackend {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

#[derive(Serialize)]
struct LoanUpdateBody<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
    #[serde(flatten)]
    form: &'a LoanForm,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        Ok(Self {
            client: builder.build()?,
            base_url: config.normalized_base_url(),
            credentials: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.credentials {
            Some(creds) => builder.header(reqwest::header::AUTHORIZATION, creds.header_value()),
            None => builder,
        }
    }

    fn json_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// JSON request carrying `body`, encoded up front so a bad body never
    /// reaches the wire.
    fn json_body<B>(&self, method: Method, path: &str, body: &B) -> Result<RequestBuilder, CoreError>
    where
        B: Serialize + ?Sized,
    {
        let bytes = encode_body(path, body)?;
        Ok(self
            .json_request(method, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(bytes))
    }

    /// Send and turn non-success statuses into `CoreError::Api`.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response, CoreError> {
        debug!(endpoint = path, "sending request");
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        warn!(endpoint = path, status = status.as_u16(), %message, "API request failed");
        Err(CoreError::Api {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json(&self, response: Response, path: &str) -> Result<Value, CoreError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse response from {path}: {e}"))
        })
    }

    async fn get_data<T>(&self, path: &str) -> Result<T, CoreError>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.send(self.json_request(Method::GET, path), path).await?;
        let body = self.read_json(response, path).await?;
        unwrap_data(body)
    }

    async fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Default,
    {
        let response = self
            .send(self.json_body(Method::POST, path, body)?, path)
            .await?;
        let body = self.read_json(response, path).await?;
        unwrap_data(body)
    }

    /// Fire a mutation and ignore whatever the server echoes back.
    async fn mutate<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), CoreError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = match body {
            Some(body) => self.json_body(method, path, body)?,
            None => self.json_request(method, path),
        };
        self.send(builder, path).await?;
        Ok(())
    }
}

fn encode_body<B>(path: &str, body: &B) -> Result<Vec<u8>, CoreError>
where
    B: Serialize + ?Sized,
{
    serde_json::to_vec(body).map_err(|e| {
        CoreError::Serialization(format!("Failed to encode request body for {path}: {e}"))
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LoanApi for HttpBackend {
    async fn list_loans(&self, query: &ListQuery) -> Result<Page<Loan>, CoreError> {
        let path = "loan/list";
        let response = self
            .send(self.json_body(Method::POST, path, query)?, path)
            .await?;
        let body = self.read_json(response, path).await?;
        if body.is_null() {
            return Ok(Page::empty());
        }
        let list: ListEnvelope<Loan> = serde_json::from_value(body)?;
        Ok(Page {
            items: list.data,
            total: list.total,
        })
    }

    async fn loan_details(&self, id: &str) -> Result<Loan, CoreError> {
        let path = format!("loan/details/{id}");
        let response = self.send(self.json_request(Method::GET, &path), &path).await?;
        let body = self.read_json(response, &path).await?;
        unwrap_record(body, "loan")
    }

    async fn create_loan(&self, form: &LoanForm) -> Result<(), CoreError> {
        self.mutate(Method::POST, "loan/create", Some(form)).await
    }

    async fn update_loan(&self, id: &str, form: &LoanForm) -> Result<(), CoreError> {
        let body = LoanUpdateBody { id, form };
        self.mutate(Method::PUT, "loan/update", Some(&body)).await
    }

    async fn delete_loan(&self, id: &str) -> Result<(), CoreError> {
        let path = format!("loan/delete/{id}");
        self.mutate::<Value>(Method::DELETE, &path, None).await
    }

    async fn add_installment(
        &self,
        id: &str,
        request: &InstallmentRequest,
    ) -> Result<(), CoreError> {
        let path = format!("loan/addInstallment/{id}");
        self.mutate(Method::POST, &path, Some(request)).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FinanceApi for HttpBackend {
    async fn list_expenses(&self, page: PageRequest) -> Result<Vec<Expense>, CoreError> {
        let list: ExpenseList = self.post_data("expense/list", &page).await?;
        Ok(list.expenses)
    }

    async fn list_investments(&self, page: PageRequest) -> Result<Vec<Investment>, CoreError> {
        let list: InvestmentList = self.post_data("investment/list", &page).await?;
        Ok(list.investments)
    }

    async fn profit_summary(&self) -> Result<ProfitSummary, CoreError> {
        self.get_data("profit/summary").await
    }

    async fn create_expense(&self, expense: &NewExpense) -> Result<(), CoreError> {
        self.mutate(Method::POST, "expense/create", Some(expense)).await
    }

    async fn create_investment(&self, investment: &NewInvestment) -> Result<(), CoreError> {
        self.mutate(Method::POST, "investment/create", Some(investment)).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DashboardApi for HttpBackend {
    async fn dashboard_details(&self) -> Result<DashboardDetails, CoreError> {
        self.get_data("dashboard/details").await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ReportApi for HttpBackend {
    async fn download_report(
        &self,
        kind: ReportKind,
        format: ReportFormat,
    ) -> Result<Report, CoreError> {
        let path = kind.path(format);
        let response = self.send(self.request(Method::GET, &path), &path).await?;
        let bytes = response.bytes().await?;
        Ok(Report::new(kind, format, bytes.to_vec()))
    }
}
