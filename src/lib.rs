//! Storefront backend: users, catalog, carts and orders, each owned by a
//! resource actor, served as a JSON REST API.

pub mod actor_framework;
pub mod app_system;
pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod domain;
pub mod http;
pub mod order_actor;
pub mod product_actor;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;
