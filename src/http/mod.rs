//! JSON REST surface over the store clients.

pub mod api_types;
pub mod error;
pub mod extract;
pub mod routes;

#[cfg(test)]
mod routes_tests;

pub use error::ApiError;
pub use routes::build_router;
