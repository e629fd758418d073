use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductPage, ProductPatch, ProductQuery};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: String) -> Result<(), ProductError> {
        debug!("Sending request");
        self.inner.delete(id).await
    }

    /// Looks up several products in one round trip; `None` marks an unknown id.
    #[instrument(skip(self))]
    pub async fn get_products(&self, ids: Vec<String>) -> Result<Vec<Option<Product>>, ProductError> {
        debug!("Sending request");
        self.inner.get_many(ids).await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: ProductQuery) -> Result<ProductPage, ProductError> {
        debug!("Sending request");
        let products = self.inner.list().await?;
        Ok(query.apply(products))
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Sells every line or none of them.
    ///
    /// # Errors
    /// `InsufficientStock` for the first line that cannot be covered, or
    /// `NotFound` if a product vanished; in both cases no stock has moved.
    #[instrument(skip(self))]
    pub async fn sell(&self, lines: Vec<(String, u32)>) -> Result<(), ProductError> {
        debug!("Sending request");
        let actions = lines
            .into_iter()
            .map(|(id, quantity)| (id, ProductAction::Sell(quantity)))
            .collect();
        self.inner.perform_batch(actions).await?;
        Ok(())
    }

    /// Puts sold stock back, reversing a [`ProductClient::sell`].
    #[instrument(skip(self))]
    pub async fn restock(&self, lines: Vec<(String, u32)>) -> Result<(), ProductError> {
        debug!("Sending request");
        let actions = lines
            .into_iter()
            .map(|(id, quantity)| (id, ProductAction::Restock(quantity)))
            .collect();
        self.inner.perform_batch(actions).await?;
        Ok(())
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}
