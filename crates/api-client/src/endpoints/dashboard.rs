use rental_core::dashboard::DashboardStats;

use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;

impl ApiClient {
    /// `GET /dashboard/stats`
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.send_json(ApiRequest::get("/dashboard/stats")).await
    }
}
