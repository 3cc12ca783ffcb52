//! Repository contracts consumed by the controllers.
//!
//! This module provides:
//! - `CarRepository` and `UserCarRepository` traits (the injected collaborators)
//! - Pagination and filtering types for car listings
//! - `RepositoryError`, the persistence-layer rejection surfaced to clients

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Car, CarFields, CarSize, NewUserCar, RentalWindow, UserCar};

/// Rejection raised by a repository operation
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UniqueConstraint(String),

    #[error("{0}")]
    ForeignKeyConstraint(String),

    #[error("{0}")]
    Database(#[source] sqlx::Error),
}

impl RepositoryError {
    /// Stable error kind reported to clients as `error.name`
    pub fn name(&self) -> &'static str {
        match self {
            RepositoryError::Validation(_) => "ValidationError",
            RepositoryError::UniqueConstraint(_) => "UniqueConstraintError",
            RepositoryError::ForeignKeyConstraint(_) => "ForeignKeyConstraintError",
            RepositoryError::Database(_) => "DatabaseError",
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db_err) => Some(db_err.kind()),
            _ => None,
        };

        match kind {
            Some(sqlx::error::ErrorKind::UniqueViolation) => {
                RepositoryError::UniqueConstraint(err.to_string())
            }
            Some(sqlx::error::ErrorKind::ForeignKeyViolation) => {
                RepositoryError::ForeignKeyConstraint(err.to_string())
            }
            Some(sqlx::error::ErrorKind::NotNullViolation)
            | Some(sqlx::error::ErrorKind::CheckViolation) => {
                RepositoryError::Validation(err.to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

/// Page selection for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pagination {
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// Number of pages needed to hold `count` records
    pub fn page_count(&self, count: i64) -> i64 {
        if count <= 0 {
            return 0;
        }
        let size = self.page_size as i64;
        (count + size - 1) / size
    }
}

/// Filter applied to both the listing and its count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFilter {
    pub size: Option<CarSize>,
    /// Exclude cars with a rental covering this instant
    pub available_at: Option<DateTime<Utc>>,
}

/// Bulk-read options: filter plus offset/limit
#[derive(Debug, Clone, PartialEq)]
pub struct CarListQuery {
    pub filter: CarFilter,
    pub offset: i64,
    pub limit: i64,
}

impl CarListQuery {
    pub fn new(filter: CarFilter, pagination: &Pagination) -> Self {
        Self {
            filter,
            offset: pagination.offset(),
            limit: pagination.limit(),
        }
    }
}

/// Car persistence operations
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// List cars matching the query, ordered by id
    async fn find_all(&self, query: &CarListQuery) -> Result<Vec<Car>, RepositoryError>;

    /// Count cars matching the filter
    async fn count(&self, filter: &CarFilter) -> Result<i64, RepositoryError>;

    /// Validate and insert a new car
    async fn create(&self, fields: CarFields) -> Result<Car, RepositoryError>;

    /// Delete by id, returning the number of rows removed
    async fn destroy(&self, id: i64) -> Result<u64, RepositoryError>;

    /// Find a car by primary key
    async fn find_by_pk(&self, id: i64) -> Result<Option<Car>, RepositoryError>;

    /// Apply `fields` to a previously resolved record
    async fn update(&self, car: Car, fields: CarFields) -> Result<Car, RepositoryError>;
}

/// Rental persistence operations
#[async_trait]
pub trait UserCarRepository: Send + Sync {
    /// Find one rental of `car_id` whose window overlaps `window`
    async fn find_one(
        &self,
        car_id: i64,
        window: &RentalWindow,
    ) -> Result<Option<UserCar>, RepositoryError>;

    /// Insert a rental
    async fn create(&self, rental: NewUserCar) -> Result<UserCar, RepositoryError>;
}
