//! In-process store implementing both repository traits.
//!
//! Used when no `DATABASE_URL` is configured and by the router tests.
//! Applies the same model validation and cascade rules as the Postgres schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::repository::{
    CarFilter, CarListQuery, CarRepository, RepositoryError, UserCarRepository,
};
use crate::models::{Car, CarFields, NewUserCar, RentalWindow, UserCar};

#[derive(Default)]
struct Tables {
    cars: BTreeMap<i64, Car>,
    user_cars: BTreeMap<i64, UserCar>,
    next_car_id: i64,
    next_user_car_id: i64,
}

impl Tables {
    fn matches(&self, car: &Car, filter: &CarFilter) -> bool {
        if let Some(size) = filter.size {
            if car.size != size {
                return false;
            }
        }

        if let Some(at) = filter.available_at {
            let rented = self
                .user_cars
                .values()
                .any(|rental| rental.car_id == car.id && RentalWindow::from(rental).contains(at));
            if rented {
                return false;
            }
        }

        true
    }
}

#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarRepository for InMemoryDatabase {
    async fn find_all(&self, query: &CarListQuery) -> Result<Vec<Car>, RepositoryError> {
        let tables = self.tables.read().await;
        let cars = tables
            .cars
            .values()
            .filter(|car| tables.matches(car, &query.filter))
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(cars)
    }

    async fn count(&self, filter: &CarFilter) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        let count = tables
            .cars
            .values()
            .filter(|car| tables.matches(car, filter))
            .count();

        Ok(count as i64)
    }

    async fn create(&self, fields: CarFields) -> Result<Car, RepositoryError> {
        let new_car = fields.into_new_car()?;
        let mut tables = self.tables.write().await;

        tables.next_car_id += 1;
        let now = Utc::now();
        let car = Car {
            id: tables.next_car_id,
            name: new_car.name,
            price: new_car.price,
            size: new_car.size,
            image: new_car.image,
            is_currently_rented: false,
            created_at: now,
            updated_at: now,
        };
        tables.cars.insert(car.id, car.clone());

        Ok(car)
    }

    async fn destroy(&self, id: i64) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = tables.cars.remove(&id);

        if removed.is_some() {
            tables.user_cars.retain(|_, rental| rental.car_id != id);
            return Ok(1);
        }

        Ok(0)
    }

    async fn find_by_pk(&self, id: i64) -> Result<Option<Car>, RepositoryError> {
        Ok(self.tables.read().await.cars.get(&id).cloned())
    }

    async fn update(&self, car: Car, fields: CarFields) -> Result<Car, RepositoryError> {
        fields.check()?;
        let mut tables = self.tables.write().await;

        let stored = tables.cars.get_mut(&car.id).ok_or_else(|| {
            RepositoryError::Database(sqlx::Error::RowNotFound)
        })?;
        fields.apply_to(stored);
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }
}

#[async_trait]
impl UserCarRepository for InMemoryDatabase {
    async fn find_one(
        &self,
        car_id: i64,
        window: &RentalWindow,
    ) -> Result<Option<UserCar>, RepositoryError> {
        let tables = self.tables.read().await;
        let rental = tables
            .user_cars
            .values()
            .filter(|rental| rental.car_id == car_id)
            .find(|rental| RentalWindow::from(*rental).overlaps(window))
            .cloned();

        Ok(rental)
    }

    async fn create(&self, rental: NewUserCar) -> Result<UserCar, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.cars.contains_key(&rental.car_id) {
            return Err(RepositoryError::ForeignKeyConstraint(format!(
                "insert or update on table \"user_cars\" violates foreign key constraint: car {} does not exist",
                rental.car_id
            )));
        }

        if rental
            .rent_ended_at
            .is_some_and(|ended_at| ended_at < rental.rent_started_at)
        {
            return Err(RepositoryError::Validation(format!(
                "rental for car {} ends before it starts",
                rental.car_id
            )));
        }

        tables.next_user_car_id += 1;
        let now = Utc::now();
        let created = UserCar {
            id: tables.next_user_car_id,
            user_id: rental.user_id,
            car_id: rental.car_id,
            rent_started_at: rental.rent_started_at,
            rent_ended_at: rental.rent_ended_at,
            created_at: now,
            updated_at: now,
        };
        tables.user_cars.insert(created.id, created.clone());

        Ok(created)
    }
}
