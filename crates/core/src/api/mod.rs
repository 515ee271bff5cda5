pub mod report;
pub mod traits;

// Wire-level plumbing
pub(crate) mod envelope;
pub mod http;
