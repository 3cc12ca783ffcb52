//! Runs against a real database when `TEST_DATABASE_URL` is set.

use anyhow::Result;
use car_rental_api::database::{
    self, CarRepository, PgCarRepository, PgUserCarRepository, UserCarRepository,
};
use car_rental_api::models::{CarFields, CarSize, NewUserCar, RentalWindow};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

async fn setup_repositories() -> Result<Option<(PgCarRepository, PgUserCarRepository)>> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("Skipping test: TEST_DATABASE_URL not set");
            return Ok(None);
        }
    };

    let pool = database::setup_database(&url, 2).await?;
    database::run_migrations(&pool).await?;

    Ok(Some((
        PgCarRepository::new(pool.clone()),
        PgUserCarRepository::new(pool),
    )))
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 3, d, 0, 0, 0).unwrap()
}

fn fields(name: &str) -> CarFields {
    CarFields {
        name: Some(name.to_string()),
        price: Some(Decimal::new(275_000, 0)),
        size: Some(CarSize::Medium),
        image: None,
    }
}

#[tokio::test]
async fn test_car_crud_round_trip() -> Result<()> {
    let Some((cars, _)) = setup_repositories().await? else {
        return Ok(());
    };

    let name = format!("Merc 240D {}", Uuid::new_v4());
    let created = cars.create(fields(&name)).await?;
    assert_eq!(created.name, name);
    assert!(!created.is_currently_rented);

    let found = cars.find_by_pk(created.id).await?;
    assert_eq!(found.as_ref().map(|c| c.id), Some(created.id));

    let updated = cars
        .update(
            created.clone(),
            CarFields {
                size: Some(CarSize::Large),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.size, CarSize::Large);
    assert_eq!(updated.name, name);

    assert_eq!(cars.destroy(created.id).await?, 1);
    assert_eq!(cars.destroy(created.id).await?, 0);
    assert!(cars.find_by_pk(created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_negative_price() -> Result<()> {
    let Some((cars, _)) = setup_repositories().await? else {
        return Ok(());
    };

    let err = cars
        .create(CarFields {
            price: Some(Decimal::new(-1, 0)),
            ..fields("Fiat 128")
        })
        .await
        .unwrap_err();
    assert_eq!(err.name(), "ValidationError");

    Ok(())
}

#[tokio::test]
async fn test_rental_overlap_and_cascade() -> Result<()> {
    let Some((cars, rentals)) = setup_repositories().await? else {
        return Ok(());
    };

    let car = cars
        .create(fields(&format!("Honda Civic {}", Uuid::new_v4())))
        .await?;

    let rental = rentals
        .create(NewUserCar {
            user_id: 3,
            car_id: car.id,
            rent_started_at: day(1),
            rent_ended_at: Some(day(2)),
        })
        .await?;

    let same = RentalWindow::new(day(1), Some(day(2)));
    let touching = RentalWindow::new(day(2), Some(day(3)));
    let later = RentalWindow::new(day(3), Some(day(4)));

    assert_eq!(
        rentals.find_one(car.id, &same).await?.map(|r| r.id),
        Some(rental.id)
    );
    assert!(rentals.find_one(car.id, &touching).await?.is_some());
    assert!(rentals.find_one(car.id, &later).await?.is_none());

    cars.destroy(car.id).await?;
    assert!(rentals.find_one(car.id, &same).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_rental_for_missing_car() -> Result<()> {
    let Some((_, rentals)) = setup_repositories().await? else {
        return Ok(());
    };

    let err = rentals
        .create(NewUserCar {
            user_id: 1,
            car_id: i64::MAX,
            rent_started_at: day(1),
            rent_ended_at: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.name(), "ForeignKeyConstraintError");

    Ok(())
}

#[tokio::test]
async fn test_rental_window_check_constraint() -> Result<()> {
    let Some((cars, rentals)) = setup_repositories().await? else {
        return Ok(());
    };

    let car = cars
        .create(fields(&format!("Toyota Corolla {}", Uuid::new_v4())))
        .await?;

    let err = rentals
        .create(NewUserCar {
            user_id: 1,
            car_id: car.id,
            rent_started_at: day(3),
            rent_ended_at: Some(day(2)),
        })
        .await
        .unwrap_err();
    assert_eq!(err.name(), "ValidationError");

    cars.destroy(car.id).await?;
    Ok(())
}
