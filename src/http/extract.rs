//! Identity extractors.
//!
//! The acting user is named by the `X-User-Id` header and looked up in the
//! user store on every request.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app_system::AppState;
use crate::domain::User;
use crate::http::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Any signed-in user who is not blocked.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// A signed-in user with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Not authorized, no user id"))?;

        let user = state
            .user_client
            .get_user(user_id.to_string())
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authorized, user not found"))?;

        if user.is_blocked {
            return Err(ApiError::forbidden("Your account has been blocked"));
        }
        Ok(Self(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Not authorized as an admin"));
        }
        Ok(Self(user))
    }
}
