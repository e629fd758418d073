use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus, PaymentStatus, StatusEntry, TransitionPolicy};
use super::actions::OrderAction;
use super::error::OrderError;

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = Order;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Order from validated, already priced line items.
    ///
    /// # Notes
    /// The total is derived here from the line items, the order starts as
    /// `pending` and the history is seeded with a single "Order placed" entry.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("Order must contain at least one item".into()));
        }
        let now = Utc::now();
        let total_amount: Decimal = params.items.iter().map(|item| item.line_total()).sum();
        let paid_at = (params.payment_status == PaymentStatus::Paid).then_some(now);

        Ok(Self {
            id,
            user_id: params.user_id,
            items: params.items,
            shipping_address: params.shipping_address,
            total_amount,
            payment_status: params.payment_status,
            status: OrderStatus::Pending,
            status_history: vec![StatusEntry {
                status: OrderStatus::Pending,
                timestamp: now,
                comment: Some("Order placed".to_string()),
            }],
            delivered_at: None,
            paid_at,
            created_at: now,
        })
    }

    /// Orders are never patched; they change only through [`OrderAction`].
    fn on_update(&mut self, _patch: ()) -> Result<(), OrderError> {
        Ok(())
    }

    /// Orders are never deleted.
    fn on_delete(&self) -> Result<(), OrderError> {
        Err(OrderError::ValidationError("Orders cannot be deleted".into()))
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<Order, OrderError> {
        let OrderAction::Update { update, policy } = action;
        let now = Utc::now();

        // Check before writing anything so a rejected transition leaves the
        // payment status untouched as well.
        if let Some(next) = update.status {
            if policy == TransitionPolicy::Strict && !self.status.can_transition_to(next) {
                return Err(OrderError::InvalidTransition {
                    from: self.status,
                    to: next,
                });
            }
        }

        if let Some(next) = update.status {
            self.status = next;
            self.status_history.push(StatusEntry {
                status: next,
                timestamp: now,
                comment: Some(
                    update
                        .comment
                        .clone()
                        .unwrap_or_else(|| format!("Status changed to {next}")),
                ),
            });
            if next == OrderStatus::Delivered {
                self.delivered_at = Some(now);
            }
        }

        if let Some(payment_status) = update.payment_status {
            self.payment_status = payment_status;
            if payment_status == PaymentStatus::Paid && self.paid_at.is_none() {
                self.paid_at = Some(now);
            }
        }

        Ok(self.clone())
    }
}
