use rental_core::catalog::{Page, PageInput, SystemTemplate, SystemTemplateInput};

use super::segment;
use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;

impl ApiClient {
    pub async fn list_pages(&self) -> Result<Vec<Page>> {
        self.send_json(ApiRequest::get("/pages")).await
    }

    pub async fn get_page(&self, id: &str) -> Result<Page> {
        self.send_json(ApiRequest::get(format!("/pages/{}", segment(id))))
            .await
    }

    pub async fn create_page(&self, input: &PageInput) -> Result<Page> {
        input.validate()?;
        self.send_json(ApiRequest::post("/pages").json(input)?).await
    }

    pub async fn update_page(&self, id: &str, input: &PageInput) -> Result<Page> {
        input.validate()?;
        self.send_json(ApiRequest::put(format!("/pages/{}", segment(id))).json(input)?)
            .await
    }

    pub async fn delete_page(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("/pages/{}", segment(id))))
            .await?;
        Ok(())
    }

    pub async fn list_templates(&self) -> Result<Vec<SystemTemplate>> {
        self.send_json(ApiRequest::get("/system-templates")).await
    }

    pub async fn get_template(&self, id: &str) -> Result<SystemTemplate> {
        self.send_json(ApiRequest::get(format!("/system-templates/{}", segment(id))))
            .await
    }

    pub async fn create_template(&self, input: &SystemTemplateInput) -> Result<SystemTemplate> {
        input.validate()?;
        self.send_json(ApiRequest::post("/system-templates").json(input)?)
            .await
    }

    pub async fn update_template(
        &self,
        id: &str,
        input: &SystemTemplateInput,
    ) -> Result<SystemTemplate> {
        input.validate()?;
        let request = ApiRequest::put(format!("/system-templates/{}", segment(id))).json(input)?;
        self.send_json(request).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("/system-templates/{}", segment(id))))
            .await?;
        Ok(())
    }
}
