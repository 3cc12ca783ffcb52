pub mod cars;
pub mod extractors;
pub mod health;
pub mod response;

// Re-export commonly used types
pub use cars::{CarController, RentCarRequest};
pub use extractors::{JsonBody, ListCarsParams, QueryParams};
pub use response::{CarListResponse, Created, ListMeta, NoContent, PaginationMeta};
