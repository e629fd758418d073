//! Error type bridging domain errors and HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::cart_actor::CartError;
use crate::http::api_types::MessageResponse;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Application error type for handlers.
///
/// Renders as `{"success": false, "message": ...}` with the given status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        }
        (self.status, Json(MessageResponse::failure(self.message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => Self::not_found("User not found"),
            UserError::AlreadyExists(_) => Self::conflict("User already exists with this email"),
            UserError::ValidationError(message) => Self::bad_request(message),
            UserError::ActorCommunicationError(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::not_found("Product not found"),
            ProductError::ValidationError(message) => Self::bad_request(message),
            ProductError::InsufficientStock { .. } | ProductError::InvalidQuantity(_) => {
                Self::bad_request(err.to_string())
            }
            ProductError::ActorCommunicationError(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ProductUnavailable(_) => Self::not_found("Product not found"),
            CartError::NotFound(_) | CartError::ItemNotFound(_) => Self::not_found(err.to_string()),
            CartError::InvalidQuantity | CartError::ExceedsStock { .. } => Self::bad_request(err.to_string()),
            CartError::ActorCommunicationError(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => Self::not_found("Order not found"),
            OrderError::UnavailableProduct(_)
            | OrderError::InvalidUser(_)
            | OrderError::InsufficientStock { .. }
            | OrderError::ValidationError(_)
            | OrderError::InvalidTransition { .. } => Self::bad_request(err.to_string()),
            OrderError::ActorCommunicationError(_) => Self::internal(err.to_string()),
        }
    }
}
