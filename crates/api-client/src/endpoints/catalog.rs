use rental_core::catalog::{Brand, BrandInput, Car, CarInput, Package, PackageInput};

use super::segment;
use crate::client::ApiClient;
use crate::error::Result;
use crate::transport::ApiRequest;

impl ApiClient {
    pub async fn list_cars(&self) -> Result<Vec<Car>> {
        self.send_json(ApiRequest::get("/cars")).await
    }

    pub async fn get_car(&self, id: &str) -> Result<Car> {
        self.send_json(ApiRequest::get(format!("/cars/{}", segment(id))))
            .await
    }

    pub async fn create_car(&self, input: &CarInput) -> Result<Car> {
        input.validate()?;
        self.send_json(ApiRequest::post("/cars").json(input)?).await
    }

    pub async fn update_car(&self, id: &str, input: &CarInput) -> Result<Car> {
        input.validate()?;
        self.send_json(ApiRequest::put(format!("/cars/{}", segment(id))).json(input)?)
            .await
    }

    pub async fn delete_car(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("/cars/{}", segment(id))))
            .await?;
        Ok(())
    }

    pub async fn list_brands(&self) -> Result<Vec<Brand>> {
        self.send_json(ApiRequest::get("/cars/brands")).await
    }

    pub async fn create_brand(&self, input: &BrandInput) -> Result<Brand> {
        input.validate()?;
        self.send_json(ApiRequest::post("/cars/brands").json(input)?)
            .await
    }

    pub async fn update_brand(&self, id: &str, input: &BrandInput) -> Result<Brand> {
        input.validate()?;
        self.send_json(ApiRequest::put(format!("/cars/brands/{}", segment(id))).json(input)?)
            .await
    }

    pub async fn delete_brand(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("/cars/brands/{}", segment(id))))
            .await?;
        Ok(())
    }

    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        self.send_json(ApiRequest::get("/packages")).await
    }

    pub async fn get_package(&self, id: &str) -> Result<Package> {
        self.send_json(ApiRequest::get(format!("/packages/{}", segment(id))))
            .await
    }

    pub async fn create_package(&self, input: &PackageInput) -> Result<Package> {
        input.validate()?;
        self.send_json(ApiRequest::post("/packages").json(input)?)
            .await
    }

    pub async fn update_package(&self, id: &str, input: &PackageInput) -> Result<Package> {
        input.validate()?;
        self.send_json(ApiRequest::put(format!("/packages/{}", segment(id))).json(input)?)
            .await
    }

    pub async fn delete_package(&self, id: &str) -> Result<()> {
        self.send(ApiRequest::delete(format!("/packages/{}", segment(id))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::MockBackend;
    use rental_core::catalog::{FuelType, Transmission};
    use rental_core::session::SessionContext;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_invalid_car_is_not_sent() {
        let backend = Arc::new(MockBackend::new("t"));
        let client = ApiClient::new(backend.clone(), SessionContext::with_token("t"));

        let input = CarInput {
            name: "".into(),
            brand: "b1".into(),
            seats: 5,
            fuel_type: FuelType::Electric,
            transmission: Transmission::Automatic,
            price_per_day: 4000.0,
            images: vec![],
            is_active: true,
        };
        let err = client.create_car(&input).await.unwrap_err();
        assert!(matches!(err, ClientError::Core(_)));
        assert!(backend.requests().is_empty());
    }
}
