use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Cart, CartCreate, CartItem};
use super::actions::CartAction;
use super::error::CartError;

fn check_quantity(quantity: u32, stock: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }
    if quantity > stock {
        return Err(CartError::ExceedsStock {
            requested: quantity,
            available: stock,
        });
    }
    Ok(())
}

impl Entity for Cart {
    type Id = String;
    type CreateParams = CartCreate;
    type Patch = ();
    type Action = CartAction;
    type ActionResult = Cart;
    type Error = CartError;

    fn id(&self) -> &String {
        &self.user_id
    }

    fn from_create_params(user_id: String, _params: CartCreate) -> Result<Self, CartError> {
        Ok(Self {
            user_id,
            items: Vec::new(),
            updated_at: Utc::now(),
        })
    }

    /// Carts change only through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), CartError> {
        Ok(())
    }

    fn handle_action(&mut self, action: CartAction) -> Result<Cart, CartError> {
        match action {
            CartAction::AddItem { product_id, quantity, price, stock } => {
                if quantity == 0 {
                    return Err(CartError::InvalidQuantity);
                }
                match self.items.iter_mut().find(|item| item.product_id == product_id) {
                    Some(item) => {
                        let merged = item.quantity.saturating_add(quantity);
                        check_quantity(merged, stock)?;
                        item.quantity = merged;
                        item.price = price;
                    }
                    None => {
                        check_quantity(quantity, stock)?;
                        self.items.push(CartItem { product_id, quantity, price });
                    }
                }
            }
            CartAction::UpdateItem { product_id, quantity, price, stock } => {
                if quantity == 0 {
                    return Err(CartError::InvalidQuantity);
                }
                let item = self
                    .items
                    .iter_mut()
                    .find(|item| item.product_id == product_id)
                    .ok_or(CartError::ItemNotFound(product_id))?;
                check_quantity(quantity, stock)?;
                item.quantity = quantity;
                item.price = price;
            }
            CartAction::RemoveItem { product_id } => {
                self.items.retain(|item| item.product_id != product_id);
            }
            CartAction::Clear => self.items.clear(),
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}
