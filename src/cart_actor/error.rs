use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),
    #[error("Product not found: {0}")]
    ProductUnavailable(String),
    #[error("Cart item not found: {0}")]
    ItemNotFound(String),
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Quantity exceeds available stock: requested {requested}, available {available}")]
    ExceedsStock { requested: u32, available: u32 },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CartError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}
