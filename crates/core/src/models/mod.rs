pub mod dashboard;
pub mod finance;
pub mod loan;
pub mod permission;
pub mod query;
pub mod trend;
pub mod wire;
