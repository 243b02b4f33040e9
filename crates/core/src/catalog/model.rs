//! Fleet catalog: brands, cars and rental packages

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl BrandInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.name, "Brand name")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
    Electric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub seats: u8,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub price_per_day: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    pub name: String,
    pub brand: String,
    pub seats: u8,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub price_per_day: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_active: bool,
}

impl CarInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.name, "Car name")?;
        require(&self.brand, "Brand")?;
        if self.seats == 0 {
            return Err(Error::InvalidInput("Seats must be greater than zero".into()));
        }
        if self.price_per_day.is_nan() || self.price_per_day <= 0.0 {
            return Err(Error::InvalidInput(
                "Price per day must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub duration_hours: u32,
    #[serde(default)]
    pub distance_km: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub duration_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<u32>,
    pub is_active: bool,
}

impl PackageInput {
    pub fn validate(&self) -> Result<()> {
        require(&self.name, "Package name")?;
        if self.duration_hours == 0 {
            return Err(Error::InvalidInput("Duration must be at least one hour".into()));
        }
        if self.price.is_nan() || self.price < 0.0 {
            return Err(Error::InvalidInput("Price must be zero or more".into()));
        }
        Ok(())
    }
}

/// Response of the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}
