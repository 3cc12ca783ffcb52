// Services shared by request handlers

pub mod date_provider;

pub use date_provider::{DateProvider, DurationUnit, FixedDateProvider, SystemDateProvider};
