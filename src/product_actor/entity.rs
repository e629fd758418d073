use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};
use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2000;

fn validate_name(name: &str) -> Result<String, ProductError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProductError::ValidationError("Please provide product name".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ProductError::ValidationError(format!(
            "Product name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: String) -> Result<String, ProductError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ProductError::ValidationError(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description)
}

fn validate_price(price: Decimal) -> Result<Decimal, ProductError> {
    if price < Decimal::ZERO {
        return Err(ProductError::ValidationError("Price cannot be negative".into()));
    }
    Ok(price)
}

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the product
    /// * `params` - Product creation parameters; the sold counter always starts at zero
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        let now = Utc::now();
        Ok(Self {
            id,
            name: validate_name(&params.name)?,
            description: validate_description(params.description)?,
            category: params.category.trim().to_string(),
            brand: params.brand,
            price: validate_price(params.price)?,
            stock: params.stock,
            sold: 0,
            is_active: params.is_active,
            is_featured: params.is_featured,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an admin edit. Every supplied field is validated before any is written.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let description = patch.description.map(validate_description).transpose()?;
        let price = patch.price.map(validate_price).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(brand) = patch.brand {
            self.brand = Some(brand);
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(is_featured) = patch.is_featured {
            self.is_featured = is_featured;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `Sell(amount)`: Decrements stock and increments sold, only if enough stock is left
    /// - `Restock(amount)`: Reverses a sale
    ///
    /// # Errors
    /// Returns an error if attempting to sell more stock than available or a zero amount.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::Sell(0) | ProductAction::Restock(0) => Err(ProductError::InvalidQuantity(0)),
            ProductAction::Sell(amount) => {
                if self.stock < amount {
                    return Err(ProductError::InsufficientStock {
                        product: self.name.clone(),
                        requested: amount,
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                self.sold = self.sold.saturating_add(amount);
                Ok(ProductActionResult::Sell(self.stock))
            }
            ProductAction::Restock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                self.sold = self.sold.saturating_sub(amount);
                Ok(ProductActionResult::Restock(self.stock))
            }
        }
    }
}
