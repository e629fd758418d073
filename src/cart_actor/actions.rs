use rust_decimal::Decimal;

/// Custom actions for Cart entities.
///
/// Stock and price are read from the catalog by the cart client and carried in
/// the action, so the quantity check runs against the cart as the actor holds it.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Adds a product, merging with an existing line for the same product.
    AddItem {
        product_id: String,
        quantity: u32,
        price: Decimal,
        stock: u32,
    },
    /// Replaces the quantity of an existing line.
    UpdateItem {
        product_id: String,
        quantity: u32,
        price: Decimal,
        stock: u32,
    },
    /// Drops a line. Removing a product that is not in the cart is a no-op.
    RemoveItem { product_id: String },
    Clear,
}
