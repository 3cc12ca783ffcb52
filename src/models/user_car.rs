use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A rental: links a user to a car for a window of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCar {
    pub id: i64,
    pub user_id: i64,
    pub car_id: i64,
    pub rent_started_at: DateTime<Utc>,
    /// `None` means the rental has no fixed end
    pub rent_ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for inserting a rental.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserCar {
    pub user_id: i64,
    pub car_id: i64,
    pub rent_started_at: DateTime<Utc>,
    pub rent_ended_at: Option<DateTime<Utc>>,
}

/// Inclusive time window `[started_at, ended_at]`; an open end is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalWindow {
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl RentalWindow {
    pub fn new(started_at: DateTime<Utc>, ended_at: Option<DateTime<Utc>>) -> Self {
        Self { started_at, ended_at }
    }

    /// Both boundaries are inclusive, so windows touching at one instant overlap.
    pub fn overlaps(&self, other: &RentalWindow) -> bool {
        let starts_before_other_ends = other
            .ended_at
            .map_or(true, |end| self.started_at <= end);
        let ends_after_other_starts = self
            .ended_at
            .map_or(true, |end| end >= other.started_at);

        starts_before_other_ends && ends_after_other_starts
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.started_at <= at && self.ended_at.map_or(true, |end| end >= at)
    }
}

impl From<&UserCar> for RentalWindow {
    fn from(rental: &UserCar) -> Self {
        RentalWindow::new(rental.rent_started_at, rental.rent_ended_at)
    }
}
