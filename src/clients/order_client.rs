use std::collections::HashMap;

use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{CartClient, ProductClient, UserClient};
use crate::domain::{
    LineItem, Order, OrderCreate, OrderLineRequest, OrderUpdate, PlaceOrder, TransitionPolicy,
};
use crate::order_actor::{OrderAction, OrderError};
use crate::product_actor::ProductError;

/// Client for interacting with the Order actor.
///
/// This client handles the placement saga: it validates the user and every
/// product, commits stock in one atomic batch, stores the order and finally
/// empties the user's cart.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    cart_client: CartClient,
    policy: TransitionPolicy,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        cart_client: CartClient,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            cart_client,
            policy,
        }
    }

    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn place_order(&self, user_id: String, request: PlaceOrder) -> Result<Order, OrderError> {
        info!("Processing place_order request");

        // Step 1: Validate the request itself
        let lines = merge_lines(request.items)?;
        let missing = request.shipping_address.missing_fields();
        if !missing.is_empty() {
            return Err(OrderError::ValidationError(format!(
                "Shipping address is missing: {}",
                missing.join(", ")
            )));
        }

        // Step 2: Validate user
        match self.user_client.get_user(user_id.clone()).await {
            Ok(Some(user)) => info!(user_name = %user.name, "User validation successful"),
            Ok(None) => {
                error!(%user_id, "User not found");
                return Err(OrderError::InvalidUser(user_id));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(OrderError::InvalidUser(format!("User validation failed: {e}")));
            }
        }

        // Step 3: Validate products, all of them before any stock check
        let ids = lines.iter().map(|(id, _)| id.clone()).collect();
        let products = self
            .product_client
            .get_products(ids)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;

        for ((product_id, _), product) in lines.iter().zip(&products) {
            match product {
                Some(product) if product.is_active => {}
                Some(product) => return Err(OrderError::UnavailableProduct(product.name.clone())),
                None => return Err(OrderError::UnavailableProduct(product_id.clone())),
            }
        }

        let mut items = Vec::with_capacity(lines.len());
        for ((product_id, quantity), product) in lines.iter().zip(products.into_iter().flatten()) {
            if *quantity > product.stock {
                info!(%product_id, quantity, available = product.stock, "Insufficient stock");
                return Err(OrderError::InsufficientStock {
                    product: product.name,
                    requested: *quantity,
                    available: product.stock,
                });
            }
            items.push(LineItem {
                product_id: product.id,
                name: product.name,
                quantity: *quantity,
                unit_price: product.price,
            });
        }

        // Step 4: Commit stock; a concurrent checkout may still win here
        if let Err(e) = self.product_client.sell(lines.clone()).await {
            error!(error = %e, "Stock commit failed");
            return Err(match e {
                ProductError::InsufficientStock { product, requested, available } => {
                    OrderError::InsufficientStock { product, requested, available }
                }
                ProductError::NotFound(id) => OrderError::UnavailableProduct(id),
                other => OrderError::ActorCommunicationError(other.to_string()),
            });
        }
        info!("Stock committed successfully");

        // Step 5: Persist the order, giving the stock back if that fails
        let payload = OrderCreate {
            user_id: user_id.clone(),
            items,
            shipping_address: request.shipping_address,
            payment_status: request.payment_status.unwrap_or_default(),
        };
        let order = match self.inner.create(payload).await {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order persistence failed, restocking");
                if let Err(restock_err) = self.product_client.restock(lines).await {
                    error!(error = %restock_err, "Restock after failed order failed");
                }
                return Err(e);
            }
        };
        info!(order_id = %order.id, total = %order.total_amount, "Order placed");

        // Step 6: Empty the cart; the order stands either way
        if let Err(e) = self.cart_client.clear_cart(user_id).await {
            warn!(order_id = %order.id, error = %e, "Failed to clear cart after order");
        }

        Ok(order)
    }

    /// Applies a status and/or payment change under the configured transition policy.
    #[instrument(skip(self))]
    pub async fn update_order(&self, id: String, update: OrderUpdate) -> Result<Order, OrderError> {
        debug!("Sending request");
        let order = self
            .inner
            .perform_action(
                id,
                OrderAction::Update {
                    update,
                    policy: self.policy,
                },
            )
            .await?;
        info!(order_id = %order.id, status = %order.status, "Order updated");
        Ok(order)
    }

    /// Orders of one user, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let mut orders: Vec<Order> = self
            .inner
            .list()
            .await?
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    /// Every order, newest first.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let mut orders = self.inner.list().await?;
        newest_first(&mut orders);
        Ok(orders)
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);

pub(crate) fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| sequence(&b.id).cmp(&sequence(&a.id)))
    });
}

/// The counter after the last `_` of a generated id, e.g. `10` for `order_10`.
fn sequence(id: &str) -> u64 {
    id.rsplit('_').next().and_then(|n| n.parse().ok()).unwrap_or(0)
}

/// Merges repeated products by summing their quantities, keeping first-seen order.
fn merge_lines(requested: Vec<OrderLineRequest>) -> Result<Vec<(String, u32)>, OrderError> {
    if requested.is_empty() {
        return Err(OrderError::ValidationError("Order must contain at least one item".into()));
    }

    let mut lines: Vec<(String, u32)> = Vec::with_capacity(requested.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    for line in requested {
        if line.quantity == 0 {
            return Err(OrderError::ValidationError(format!(
                "Quantity for product {} must be at least 1",
                line.product
            )));
        }
        match positions.get(&line.product) {
            Some(&at) => {
                lines[at].1 = lines[at].1.checked_add(line.quantity).ok_or_else(|| {
                    OrderError::ValidationError(format!("Quantity for product {} is too large", line.product))
                })?;
            }
            None => {
                positions.insert(line.product.clone(), lines.len());
                lines.push((line.product, line.quantity));
            }
        }
    }
    Ok(lines)
}
