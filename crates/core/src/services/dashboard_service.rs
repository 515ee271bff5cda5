use std::sync::Arc;
use tracing::debug;

use crate::api::traits::DashboardApi;
use crate::errors::CoreError;
use crate::models::dashboard::DashboardDetails;

pub struct DashboardService {
    api: Arc<dyn DashboardApi>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    pub async fn details(&self) -> Result<DashboardDetails, CoreError> {
        let details = self.api.dashboard_details().await?;
        debug!(
            users = details.users.total_users,
            loans = details.users.total_loans,
            trend_points = details.daily_trend.len(),
            "dashboard fetched"
        );
        Ok(details)
    }
}
