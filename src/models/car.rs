//! Car inventory records and the write payload used to create or update them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::database::repository::RepositoryError;

/// Size class of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "car_size", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CarSize {
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for CarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarSize::Small => write!(f, "SMALL"),
            CarSize::Medium => write!(f, "MEDIUM"),
            CarSize::Large => write!(f, "LARGE"),
        }
    }
}

/// A car as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub size: CarSize,
    pub image: Option<String>,
    /// Plain stored column, `false` on insert; no endpoint writes it.
    /// Rental state is answered by the rentals table, not by this flag.
    pub is_currently_rented: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes accepted by create and update.
///
/// Every field is optional at the wire level: create requires `name`, `price`
/// and `size`, update only touches the fields that are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarFields {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub size: Option<CarSize>,
    #[validate(length(max = 2048, message = "image must be at most 2048 characters"))]
    pub image: Option<String>,
}

/// Fully-specified attributes for inserting a new car.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub name: String,
    pub price: Decimal,
    pub size: CarSize,
    pub image: Option<String>,
}

impl CarFields {
    /// Model-level validation shared by every repository implementation.
    pub fn check(&self) -> Result<(), RepositoryError> {
        self.validate()
            .map_err(|e| RepositoryError::Validation(e.to_string()))?;

        if let Some(price) = self.price {
            if price.is_sign_negative() {
                return Err(RepositoryError::Validation(
                    "price must not be negative".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validate and require the attributes an insert needs.
    pub fn into_new_car(self) -> Result<NewCar, RepositoryError> {
        self.check()?;

        let name = self.name.ok_or_else(|| not_null("name"))?;
        let price = self.price.ok_or_else(|| not_null("price"))?;
        let size = self.size.ok_or_else(|| not_null("size"))?;

        Ok(NewCar {
            name,
            price,
            size,
            image: self.image,
        })
    }

    /// Apply the present fields onto an existing record.
    pub fn apply_to(&self, car: &mut Car) {
        if let Some(name) = &self.name {
            car.name = name.clone();
        }
        if let Some(price) = self.price {
            car.price = price;
        }
        if let Some(size) = self.size {
            car.size = size;
        }
        if let Some(image) = &self.image {
            car.image = Some(image.clone());
        }
    }
}

fn not_null(field: &str) -> RepositoryError {
    RepositoryError::Validation(format!("notNull Violation: Car.{} cannot be null", field))
}
