use rental_core::catalog::SiteSettings;

use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;

const GENERAL_SETTINGS_PATH: &str = "/settings/general";

impl ApiClient {
    pub async fn get_settings(&self) -> Result<SiteSettings> {
        self.send_json(ApiRequest::get(GENERAL_SETTINGS_PATH)).await
    }

    pub async fn update_settings(&self, settings: &SiteSettings) -> Result<SiteSettings> {
        settings.validate()?;
        self.send_json(ApiRequest::put(GENERAL_SETTINGS_PATH).json(settings)?)
            .await
    }
}
