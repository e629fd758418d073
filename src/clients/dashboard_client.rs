use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::clients::order_client::newest_first;
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::{Order, PaymentStatus, Product};
use crate::order_actor::OrderError;

const RECENT_ORDERS: usize = 8;
const TOP_PRODUCTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_users: usize,
    pub total_orders: usize,
    /// Sum over paid orders only.
    pub total_revenue: Decimal,
    pub total_products: usize,
}

/// Admin overview of the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub metrics: DashboardMetrics,
    pub recent_orders: Vec<Order>,
    pub top_products: Vec<Product>,
}

/// Read-only aggregation over the user, product and order collections.
#[derive(Clone)]
pub struct DashboardClient {
    user_client: UserClient,
    product_client: ProductClient,
    order_client: OrderClient,
}

impl DashboardClient {
    pub fn new(user_client: UserClient, product_client: ProductClient, order_client: OrderClient) -> Self {
        Self {
            user_client,
            product_client,
            order_client,
        }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, OrderError> {
        debug!("Sending request");
        let communication = |e: &dyn std::fmt::Display| OrderError::ActorCommunicationError(e.to_string());

        let (users, products, orders) = tokio::join!(
            self.user_client.list_users(),
            self.product_client.list_products(),
            self.order_client.list_orders(),
        );
        let users = users.map_err(|e| communication(&e))?;
        let mut products = products.map_err(|e| communication(&e))?;
        let mut orders = orders?;

        let total_revenue: Decimal = orders
            .iter()
            .filter(|order| order.payment_status == PaymentStatus::Paid)
            .map(|order| order.total_amount)
            .sum();
        let metrics = DashboardMetrics {
            total_users: users.len(),
            total_orders: orders.len(),
            total_revenue,
            total_products: products.len(),
        };

        newest_first(&mut orders);
        orders.truncate(RECENT_ORDERS);

        products.sort_by(|a, b| b.sold.cmp(&a.sold).then_with(|| a.name.cmp(&b.name)));
        products.truncate(TOP_PRODUCTS);

        Ok(Dashboard {
            metrics,
            recent_orders: orders,
            top_products: products,
        })
    }
}
