use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::{Entity, ResourceActor};
use crate::clients::{CartClient, DashboardClient, OrderClient, ProductClient, UserClient};
use crate::config::Config;
use crate::domain::{Cart, Order, Product, TransitionPolicy, User};

/// Clients shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    pub order_client: OrderClient,
    pub dashboard_client: DashboardClient,
}

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    pub order_client: OrderClient,
    pub dashboard_client: DashboardClient,
    handles: Vec<JoinHandle<()>>,
}

/// Generates `prefix_1`, `prefix_2`, ...
fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}_{id}")
    }
}

fn spawn<T: Entity>(actor: ResourceActor<T>, handles: &mut Vec<JoinHandle<()>>) {
    handles.push(tokio::spawn(actor.run()));
}

impl StoreSystem {
    pub fn new(config: &Config) -> Self {
        Self::with_policy(config.actors.buffer_size, config.orders.transition_policy)
    }

    pub fn with_policy(buffer_size: usize, policy: TransitionPolicy) -> Self {
        let mut handles = Vec::with_capacity(4);

        // 1. Leaf stores
        let (user_actor, users) = ResourceActor::<User>::new(buffer_size, sequential_ids("user"));
        spawn(user_actor, &mut handles);
        let user_client = UserClient::new(users);

        let (product_actor, products) = ResourceActor::<Product>::new(buffer_size, sequential_ids("product"));
        spawn(product_actor, &mut handles);
        let product_client = ProductClient::new(products);

        // 2. Carts are keyed by user id
        let (cart_actor, carts) = ResourceActor::<Cart>::keyed(buffer_size);
        spawn(cart_actor, &mut handles);
        let cart_client = CartClient::new(carts, product_client.clone());

        // 3. Orders orchestrate everything above
        let (order_actor, orders) = ResourceActor::<Order>::new(buffer_size, sequential_ids("order"));
        spawn(order_actor, &mut handles);
        let order_client = OrderClient::new(
            orders,
            user_client.clone(),
            product_client.clone(),
            cart_client.clone(),
            policy,
        );

        let dashboard_client = DashboardClient::new(user_client.clone(), product_client.clone(), order_client.clone());

        info!(buffer_size, ?policy, "Store system started");
        Self {
            user_client,
            product_client,
            cart_client,
            order_client,
            dashboard_client,
            handles,
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            user_client: self.user_client.clone(),
            product_client: self.product_client.clone(),
            cart_client: self.cart_client.clone(),
            order_client: self.order_client.clone(),
            dashboard_client: self.dashboard_client.clone(),
        }
    }

    /// Drops every client and waits for the actors to drain.
    ///
    /// Clones handed out through [`StoreSystem::state`] must be dropped first,
    /// otherwise the actors keep running.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        let Self {
            user_client,
            product_client,
            cart_client,
            order_client,
            dashboard_client,
            handles,
        } = self;

        // Closing the channels is what stops the actors.
        drop(dashboard_client);
        drop(order_client);
        drop(cart_client);
        drop(product_client);
        drop(user_client);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
