use rental_core::cancellation::{CancellationReason, CancellationReasonInput};

use super::segment;
use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;

impl ApiClient {
    pub async fn list_cancellation_reasons(&self) -> Result<Vec<CancellationReason>> {
        self.send_json(ApiRequest::get("/cancellation-reasons"))
            .await
    }

    pub async fn create_cancellation_reason(
        &self,
        input: &CancellationReasonInput,
    ) -> Result<CancellationReason> {
        input.validate()?;
        self.send_json(ApiRequest::post("/cancellation-reasons").json(input)?)
            .await
    }

    pub async fn update_cancellation_reason(
        &self,
        id: &str,
        input: &CancellationReasonInput,
    ) -> Result<CancellationReason> {
        input.validate()?;
        let request =
            ApiRequest::put(format!("/cancellation-reasons/{}", segment(id))).json(input)?;
        self.send_json(request).await
    }

    pub async fn delete_cancellation_reason(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!(
            "/cancellation-reasons/{}",
            segment(id)
        )))
        .await?;
        Ok(())
    }
}
