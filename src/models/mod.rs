pub mod car;
pub mod user_car;

pub use car::{Car, CarFields, CarSize, NewCar};
pub use user_car::{NewUserCar, RentalWindow, UserCar};
