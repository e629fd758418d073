//! In-process tests for the HTTP surface.
//!
//! Each test builds the router over a fresh `StoreSystem` and drives it via
//! `tower::ServiceExt::oneshot`; no socket is bound.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

use crate::app_system::StoreSystem;
use crate::config::Config;
use crate::domain::{ProductCreate, TransitionPolicy, User, UserCreate};
use crate::http::build_router;
use crate::http::extract::USER_ID_HEADER;

struct Harness {
    system: StoreSystem,
    admin: User,
    customer: User,
}

impl Harness {
    async fn new() -> Self {
        Self::over(StoreSystem::with_policy(32, TransitionPolicy::Strict)).await
    }

    async fn over(system: StoreSystem) -> Self {
        let admin = system
            .user_client
            .create_user(UserCreate::admin("Admin", "admin@storefront.local"))
            .await
            .unwrap();
        let customer = system
            .user_client
            .register(UserCreate::customer("Asha Rao", "asha@example.com"))
            .await
            .unwrap();
        Self { system, admin, customer }
    }

    fn router(&self) -> Router {
        build_router(self.system.state())
    }

    async fn call(&self, method: &str, uri: &str, user: Option<&User>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            req = req.header(USER_ID_HEADER, user.id.as_str());
        }
        let req = match body {
            Some(body) => req
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let resp = self.router().oneshot(req).await.expect("oneshot failed");
        let status = resp.status();
        let bytes: bytes::Bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body collect failed")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn product(&self, name: &str, price: i64, stock: u32) -> String {
        self.system
            .product_client
            .create_product(ProductCreate::new(name, Decimal::new(price, 0), stock))
            .await
            .unwrap()
            .id
    }
}

fn shipping_address() -> Value {
    json!({
        "fullName": "Asha Rao",
        "phone": "9876543210",
        "addressLine1": "12 Lake Road",
        "city": "Pune",
        "state": "Maharashtra",
        "pincode": "411001"
    })
}

#[tokio::test]
async fn test_health_returns_success() {
    let h = Harness::new().await;
    let (status, json) = h.call("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_404_envelope() {
    let h = Harness::new().await;
    let (status, json) = h.call("GET", "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"success": false, "message": "Route not found"}));
}

#[tokio::test]
async fn test_register_then_duplicate_email_conflicts() {
    let h = Harness::new().await;
    let body = json!({"name": "Ravi", "email": "Ravi@Example.com", "role": "admin"});

    let (status, json) = h.call("POST", "/api/users", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["user"]["email"], "ravi@example.com");
    assert_eq!(json["user"]["role"], "customer");

    let (status, json) = h.call("POST", "/api/users", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_identity_is_checked() {
    let h = Harness::new().await;

    let (status, _) = h.call("GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = h.call("GET", "/api/admin/dashboard", Some(&h.customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = h.call("GET", "/api/users/me", Some(&h.customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["id"], h.customer.id.as_str());

    let uri = format!("/api/users/{}", h.customer.id);
    let (status, json) = h
        .call("PUT", &uri, Some(&h.admin), Some(json!({"isBlocked": true})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["isBlocked"], true);

    let (status, _) = h.call("GET", "/api/cart", Some(&h.customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_catalog_listing_hides_inactive_products_from_the_public() {
    let h = Harness::new().await;
    h.product("Brown Rice", 450, 10).await;
    let (status, json) = h
        .call(
            "POST",
            "/api/products",
            Some(&h.admin),
            Some(json!({"name": "Old Honey", "price": 300, "stock": 1, "isActive": false})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["product"]["isActive"], false);

    let (_, json) = h.call("GET", "/api/products?includeInactive=true", None, None).await;
    assert_eq!(json["total"], 1);

    let (_, json) = h
        .call("GET", "/api/products?includeInactive=true", Some(&h.admin), None)
        .await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["pages"], 1);
}

#[tokio::test]
async fn test_cart_then_checkout_then_admin_ships() {
    let h = Harness::new().await;
    let rice = h.product("Brown Rice", 450, 10).await;

    let (status, json) = h
        .call(
            "POST",
            "/api/cart/items",
            Some(&h.customer),
            Some(json!({"productId": rice, "quantity": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cart"]["items"][0]["quantity"], 2);

    let (status, json) = h
        .call(
            "POST",
            "/api/orders",
            Some(&h.customer),
            Some(json!({"items": [{"product": rice, "quantity": 2}], "shippingAddress": shipping_address()})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["order"]["status"], "pending");
    let order_id = json["order"]["id"].as_str().unwrap().to_string();

    let (_, json) = h.call("GET", "/api/cart", Some(&h.customer), None).await;
    assert_eq!(json["cart"]["items"], json!([]));

    let (_, json) = h.call("GET", "/api/orders/my", Some(&h.customer), None).await;
    assert_eq!(json["count"], 1);

    let uri = format!("/api/orders/{order_id}");
    let (status, json) = h
        .call("PUT", &uri, Some(&h.admin), Some(json!({"status": "shipped"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, json) = h
        .call("PUT", &uri, Some(&h.admin), Some(json!({"status": "confirmed", "paymentStatus": "paid"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order"]["status"], "confirmed");
    assert_eq!(json["order"]["paymentStatus"], "paid");

    let (_, json) = h.call("GET", "/api/admin/dashboard", Some(&h.admin), None).await;
    assert_eq!(json["metrics"]["totalOrders"], 1);
    assert_eq!(json["metrics"]["totalUsers"], 2);
    assert_eq!(json["topProducts"][0]["sold"], 2);
}

#[tokio::test]
async fn test_checkout_validation_errors_are_400() {
    let h = Harness::new().await;
    let eggs = h.product("Eggs", 120, 1).await;

    let (status, json) = h
        .call(
            "POST",
            "/api/orders",
            Some(&h.customer),
            Some(json!({"items": [], "shippingAddress": shipping_address()})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (status, _) = h
        .call(
            "POST",
            "/api/orders",
            Some(&h.customer),
            Some(json!({"items": [{"product": eggs, "quantity": 2}], "shippingAddress": shipping_address()})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = h
        .call("POST", "/api/orders", Some(&h.customer), Some(json!({"items": "nope"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_orders_are_private_to_their_owner() {
    let h = Harness::new().await;
    let rice = h.product("Brown Rice", 450, 10).await;
    let other = h
        .system
        .user_client
        .register(UserCreate::customer("Ravi Kumar", "ravi@example.com"))
        .await
        .unwrap();

    let (_, json) = h
        .call(
            "POST",
            "/api/orders",
            Some(&h.customer),
            Some(json!({"items": [{"product": rice, "quantity": 1}], "shippingAddress": shipping_address()})),
        )
        .await;
    let uri = format!("/api/orders/{}", json["order"]["id"].as_str().unwrap());

    let (status, _) = h.call("GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = h.call("GET", &uri, Some(&h.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = h.call("GET", "/api/orders/order_404", Some(&h.admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_default_config_accepts_any_status_change() {
    let config = Config::from_lookup(|_| None).unwrap();
    let h = Harness::over(StoreSystem::new(&config)).await;
    let rice = h.product("Brown Rice", 450, 10).await;

    let (status, json) = h
        .call(
            "POST",
            "/api/orders",
            Some(&h.customer),
            Some(json!({"items": [{"product": rice, "quantity": 1}], "shippingAddress": shipping_address()})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/orders/{}", json["order"]["id"].as_str().unwrap());

    let (status, json) = h
        .call("PUT", &uri, Some(&h.admin), Some(json!({"status": "delivered"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order"]["status"], "delivered");
    let delivered_at = json["order"]["deliveredAt"].clone();
    assert!(delivered_at.is_string());

    let (status, json) = h
        .call("PUT", &uri, Some(&h.admin), Some(json!({"status": "pending"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order"]["status"], "pending");
    assert_eq!(json["order"]["deliveredAt"], delivered_at);
    assert_eq!(json["order"]["statusHistory"].as_array().unwrap().len(), 3);
}
