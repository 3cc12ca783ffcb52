//! Postgres-backed repositories.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::database::repository::{
    CarFilter, CarListQuery, CarRepository, RepositoryError, UserCarRepository,
};
use crate::models::{Car, CarFields, NewUserCar, RentalWindow, UserCar};

const CAR_COLUMNS: &str =
    "id, name, price, size, image, is_currently_rented, created_at, updated_at";

const USER_CAR_COLUMNS: &str =
    "id, user_id, car_id, rent_started_at, rent_ended_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_car_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CarFilter) {
    qb.push(" WHERE TRUE");

    if let Some(size) = filter.size {
        qb.push(" AND cars.size = ").push_bind(size);
    }

    if let Some(at) = filter.available_at {
        qb.push(
            " AND NOT EXISTS (SELECT 1 FROM user_cars uc WHERE uc.car_id = cars.id AND uc.rent_started_at <= ",
        )
        .push_bind(at)
        .push(" AND (uc.rent_ended_at IS NULL OR uc.rent_ended_at >= ")
        .push_bind(at)
        .push("))");
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn find_all(&self, query: &CarListQuery) -> Result<Vec<Car>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM cars", CAR_COLUMNS));
        push_car_filter(&mut qb, &query.filter);
        qb.push(" ORDER BY cars.id ASC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let cars = qb.build_query_as::<Car>().fetch_all(&self.pool).await?;
        debug!(returned = cars.len(), offset = query.offset, "Listed cars");
        Ok(cars)
    }

    async fn count(&self, filter: &CarFilter) -> Result<i64, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM cars");
        push_car_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create(&self, fields: CarFields) -> Result<Car, RepositoryError> {
        let new_car = fields.into_new_car()?;

        let query = format!(
            "INSERT INTO cars (name, price, size, image) VALUES ($1, $2, $3, $4) RETURNING {}",
            CAR_COLUMNS
        );
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(&new_car.name)
            .bind(new_car.price)
            .bind(new_car.size)
            .bind(&new_car.image)
            .fetch_one(&self.pool)
            .await?;

        Ok(car)
    }

    async fn destroy(&self, id: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_pk(&self, id: i64) -> Result<Option<Car>, RepositoryError> {
        let query = format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS);
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    async fn update(&self, car: Car, fields: CarFields) -> Result<Car, RepositoryError> {
        fields.check()?;

        let query = format!(
            r#"
            UPDATE cars SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                size = COALESCE($4, size),
                image = COALESCE($5, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CAR_COLUMNS
        );
        let updated = sqlx::query_as::<_, Car>(&query)
            .bind(car.id)
            .bind(&fields.name)
            .bind(fields.price)
            .bind(fields.size)
            .bind(&fields.image)
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }
}

#[derive(Clone)]
pub struct PgUserCarRepository {
    pool: PgPool,
}

impl PgUserCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserCarRepository for PgUserCarRepository {
    async fn find_one(
        &self,
        car_id: i64,
        window: &RentalWindow,
    ) -> Result<Option<UserCar>, RepositoryError> {
        // An open requested end matches every rental that ends after the start.
        let query = format!(
            r#"
            SELECT {}
            FROM user_cars
            WHERE car_id = $1
            AND ($3::timestamptz IS NULL OR rent_started_at <= $3)
            AND (rent_ended_at IS NULL OR rent_ended_at >= $2)
            ORDER BY rent_started_at ASC
            LIMIT 1
            "#,
            USER_CAR_COLUMNS
        );
        let rental = sqlx::query_as::<_, UserCar>(&query)
            .bind(car_id)
            .bind(window.started_at)
            .bind(window.ended_at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rental)
    }

    async fn create(&self, rental: NewUserCar) -> Result<UserCar, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO user_cars (user_id, car_id, rent_started_at, rent_ended_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_CAR_COLUMNS
        );
        let created = sqlx::query_as::<_, UserCar>(&query)
            .bind(rental.user_id)
            .bind(rental.car_id)
            .bind(rental.rent_started_at)
            .bind(rental.rent_ended_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }
}
