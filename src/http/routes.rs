//! Axum router and all HTTP handlers.
//!
//! `build_router` is the single entry point; `main.rs` attaches the CORS and
//! tracing layers so tests can drive the bare router.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use crate::app_system::AppState;
use crate::domain::{OrderUpdate, PlaceOrder, ProductCreate, ProductPatch, ProductQuery, UserCreate, UserPatch};
use crate::http::api_types::{
    AddCartItem, CartResponse, DashboardResponse, HealthResponse, MessageResponse, OrderResponse,
    OrdersResponse, ProductListResponse, ProductResponse, UpdateCartItem, UserResponse, UsersResponse,
};
use crate::http::extract::{AdminUser, CurrentUser};
use crate::http::ApiError;

type ApiResult<T> = Result<T, ApiError>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/users", get(list_users).post(register))
        .route("/api/users/me", get(me))
        .route("/api/users/:id", put(update_user))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_cart_item))
        .route(
            "/api/cart/items/:product_id",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/api/orders", get(list_orders).post(place_order))
        .route("/api/orders/my", get(my_orders))
        .route("/api/orders/:id", get(get_order).put(update_order))
        .route("/api/admin/dashboard", get(dashboard))
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
        timestamp: Utc::now(),
    })
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub(crate) async fn register(
    State(st): State<AppState>,
    payload: JsonBody<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(params) = payload?;
    let user = st.user_client.register(params).await?;
    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse { success: true, user })))
}

pub(crate) async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse { success: true, user })
}

pub(crate) async fn list_users(State(st): State<AppState>, _admin: AdminUser) -> ApiResult<Json<UsersResponse>> {
    let mut users = st.user_client.list_users().await?;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(UsersResponse {
        success: true,
        count: users.len(),
        users,
    }))
}

pub(crate) async fn update_user(
    State(st): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    payload: JsonBody<UserPatch>,
) -> ApiResult<Json<UserResponse>> {
    let Json(patch) = payload?;
    let user = st.user_client.update_user(id, patch).await?;
    Ok(Json(UserResponse { success: true, user }))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Public catalog listing. `includeInactive` is honoured for admins only.
pub(crate) async fn list_products(
    State(st): State<AppState>,
    viewer: Option<CurrentUser>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<ProductListResponse>> {
    let Query(mut query) = query?;
    let is_admin = viewer.is_some_and(|CurrentUser(user)| user.is_admin());
    query.include_inactive &= is_admin;
    let page = st.product_client.search(query).await?;
    Ok(Json(ProductListResponse { success: true, page }))
}

pub(crate) async fn get_product(State(st): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<ProductResponse>> {
    let product = st.product_client.require_product(id).await?;
    Ok(Json(ProductResponse { success: true, product }))
}

pub(crate) async fn create_product(
    State(st): State<AppState>,
    _admin: AdminUser,
    payload: JsonBody<ProductCreate>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let Json(params) = payload?;
    let product = st.product_client.create_product(params).await?;
    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(ProductResponse { success: true, product })))
}

pub(crate) async fn update_product(
    State(st): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    payload: JsonBody<ProductPatch>,
) -> ApiResult<Json<ProductResponse>> {
    let Json(patch) = payload?;
    let product = st.product_client.update_product(id, patch).await?;
    Ok(Json(ProductResponse { success: true, product }))
}

pub(crate) async fn delete_product(
    State(st): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    st.product_client.delete_product(id).await?;
    Ok(Json(MessageResponse::ok("Product deleted successfully")))
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

pub(crate) async fn get_cart(State(st): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Json<CartResponse>> {
    let cart = st.cart_client.get_cart(user.id).await?;
    Ok(Json(cart.into()))
}

pub(crate) async fn add_cart_item(
    State(st): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: JsonBody<AddCartItem>,
) -> ApiResult<Json<CartResponse>> {
    let Json(item) = payload?;
    let cart = st.cart_client.add_item(user.id, item.product_id, item.quantity).await?;
    Ok(Json(cart.into()))
}

pub(crate) async fn update_cart_item(
    State(st): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
    payload: JsonBody<UpdateCartItem>,
) -> ApiResult<Json<CartResponse>> {
    let Json(item) = payload?;
    let cart = st.cart_client.update_item(user.id, product_id, item.quantity).await?;
    Ok(Json(cart.into()))
}

pub(crate) async fn remove_cart_item(
    State(st): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Json<CartResponse>> {
    let cart = st.cart_client.remove_item(user.id, product_id).await?;
    Ok(Json(cart.into()))
}

pub(crate) async fn clear_cart(State(st): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Json<CartResponse>> {
    let cart = st.cart_client.clear_cart(user.id).await?;
    Ok(Json(cart.into()))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

pub(crate) async fn place_order(
    State(st): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: JsonBody<PlaceOrder>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let Json(request) = payload?;
    let order = st.order_client.place_order(user.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            success: true,
            message: Some("Order placed successfully".to_string()),
            order,
        }),
    ))
}

pub(crate) async fn my_orders(State(st): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Json<OrdersResponse>> {
    let orders = st.order_client.orders_for_user(user.id).await?;
    Ok(Json(orders.into()))
}

/// Visible to the customer who placed it and to admins.
pub(crate) async fn get_order(
    State(st): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderResponse>> {
    let order = st.order_client.require_order(id).await?;
    if order.user_id != user.id && !user.is_admin() {
        return Err(ApiError::forbidden("Not authorized to view this order"));
    }
    Ok(Json(OrderResponse {
        success: true,
        message: None,
        order,
    }))
}

pub(crate) async fn list_orders(State(st): State<AppState>, _admin: AdminUser) -> ApiResult<Json<OrdersResponse>> {
    let orders = st.order_client.all_orders().await?;
    Ok(Json(orders.into()))
}

pub(crate) async fn update_order(
    State(st): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    payload: JsonBody<OrderUpdate>,
) -> ApiResult<Json<OrderResponse>> {
    let Json(update) = payload?;
    let order = st.order_client.update_order(id, update).await?;
    Ok(Json(OrderResponse {
        success: true,
        message: Some("Order updated successfully".to_string()),
        order,
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

pub(crate) async fn dashboard(State(st): State<AppState>, _admin: AdminUser) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = st.dashboard_client.dashboard().await?;
    Ok(Json(DashboardResponse { success: true, dashboard }))
}
