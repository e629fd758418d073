use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A product line in a user's cart, priced at the time it was added or last changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// A user's cart. There is exactly one per user and it is keyed by the user id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }
}

/// Creation params for a cart; carts always start empty.
#[derive(Debug, Clone, Default)]
pub struct CartCreate;
