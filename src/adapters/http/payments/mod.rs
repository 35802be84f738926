//! Payment webhook endpoints.

mod handlers;
mod routes;

pub use routes::routes;
