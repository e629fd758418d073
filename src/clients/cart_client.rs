use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::cart_actor::{CartAction, CartError};
use crate::clients::ProductClient;
use crate::domain::{Cart, CartCreate, Product};

/// Client for interacting with the Cart actor.
///
/// Price and stock are looked up in the catalog before each mutation and
/// handed to the cart actor, which does the quantity checks.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    product_client: ProductClient,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>, product_client: ProductClient) -> Self {
        Self { inner, product_client }
    }

    async fn lookup(&self, product_id: &str) -> Result<Option<Product>, CartError> {
        self.product_client
            .get_product(product_id.to_string())
            .await
            .map_err(|e| CartError::ActorCommunicationError(e.to_string()))
    }

    /// Returns the user's cart, creating an empty one on first access.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: String) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner.get_or_create(user_id, CartCreate).await
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: String, product_id: String, quantity: u32) -> Result<Cart, CartError> {
        debug!("Sending request");
        let product = match self.lookup(&product_id).await? {
            Some(product) if product.is_active => product,
            _ => return Err(CartError::ProductUnavailable(product_id)),
        };
        self.get_cart(user_id.clone()).await?;
        self.inner
            .perform_action(
                user_id,
                CartAction::AddItem {
                    product_id,
                    quantity,
                    price: product.price,
                    stock: product.stock,
                },
            )
            .await
    }

    /// Sets the quantity of a line already in the cart.
    ///
    /// A product that has since left the catalog counts as having no stock.
    #[instrument(skip(self))]
    pub async fn update_item(&self, user_id: String, product_id: String, quantity: u32) -> Result<Cart, CartError> {
        debug!("Sending request");
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let cart = self.get_cart(user_id.clone()).await?;
        if cart.item(&product_id).is_none() {
            return Err(CartError::ItemNotFound(product_id));
        }
        let product = self.lookup(&product_id).await?.ok_or(CartError::ExceedsStock {
            requested: quantity,
            available: 0,
        })?;
        self.inner
            .perform_action(
                user_id,
                CartAction::UpdateItem {
                    product_id,
                    quantity,
                    price: product.price,
                    stock: product.stock,
                },
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: String, product_id: String) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.get_cart(user_id.clone()).await?;
        self.inner
            .perform_action(user_id, CartAction::RemoveItem { product_id })
            .await
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: String) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.get_cart(user_id.clone()).await?;
        self.inner.perform_action(user_id, CartAction::Clear).await
    }
}
