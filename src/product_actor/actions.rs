/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Takes stock for a placed order and counts it as sold.
    ///
    /// # Errors
    /// Fails without touching the product if the amount exceeds available stock.
    Sell(u32),
    /// Gives back stock taken by [`ProductAction::Sell`] when an order could not be saved.
    Restock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Result from CheckStock action - returns the current stock level
    CheckStock(u32),
    /// Result from Sell action - returns the remaining stock
    Sell(u32),
    /// Result from Restock action - returns the new stock level
    Restock(u32),
}
