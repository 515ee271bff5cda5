pub mod dashboard_service;
pub mod fetch_guard;
pub mod finance_service;
pub mod loan_service;
pub mod trend_service;
