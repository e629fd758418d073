//! Response envelopes for every endpoint.
//!
//! Each body carries `success` plus the payload under its own key; no
//! business logic lives here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clients::Dashboard;
use crate::domain::{Cart, Order, Product, ProductPage, User};

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: ProductPage,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub cart: Cart,
    pub subtotal: Decimal,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            success: true,
            subtotal: cart.subtotal(),
            cart,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub order: Order,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub count: usize,
    pub orders: Vec<Order>,
}

impl From<Vec<Order>> for OrdersResponse {
    fn from(orders: Vec<Order>) -> Self {
        Self {
            success: true,
            count: orders.len(),
            orders,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

// ---------------------------------------------------------------------------
// Request bodies that have no domain counterpart
// ---------------------------------------------------------------------------

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItem {
    pub product_id: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartItem {
    pub quantity: u32,
}
