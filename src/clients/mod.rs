//! Typed handles over the resource actors.
//!
//! Each client wraps a `ResourceClient` for its own collection; the cart and
//! order clients also hold the clients they orchestrate.

#[macro_use]
mod macros;

mod cart_client;
mod dashboard_client;
mod order_client;
mod product_client;
mod user_client;

pub use cart_client::CartClient;
pub use dashboard_client::{Dashboard, DashboardClient, DashboardMetrics};
pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use user_client::UserClient;
