use std::time::{Duration, Instant};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::transport::ApiRequest;

impl ApiClient {
    /// `GET /health` bounded by `timeout`; returns the round-trip time
    pub async fn ping(&self, timeout: Duration) -> Result<Duration> {
        let started = Instant::now();
        let request = ApiRequest::get("/health").without_refresh();
        tokio::time::timeout(timeout, self.send(request))
            .await
            .map_err(|_| {
                ClientError::Network(format!("Health check timed out after {:?}", timeout))
            })??;
        Ok(started.elapsed())
    }
}
