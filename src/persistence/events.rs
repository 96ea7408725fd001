use crate::broker::{Broker, BrokerId};
use crate::order::{Order, OrderId, OrderStatus};
use crate::trade::Trade;

/// Immutable snapshots pushed onto the persistence queue. Component 7 of
/// the system overview.
///
/// Each variant is captured at the moment of enqueue, independent of any
/// further mutation the in-memory record undergoes — see DESIGN.md's
/// "snapshot discipline" note.
#[derive(Debug, Clone)]
pub enum PersistEvent {
    /// Registration of a new broker. Brokers are a durable table like
    /// orders and trades, so registration rides the same pipeline.
    NewBroker(Box<Broker>),
    /// The full order state *before* matching began, so durable history
    /// records the order as submitted, not as left after trading.
    NewOrder(Box<Order>),
    /// The full trade record plus enough broker context to drive post-commit
    /// webhook dispatch without reading the broker registry again.
    Trade {
        trade: Trade,
        buy_broker: WebhookTarget,
        sell_broker: WebhookTarget,
        buy_remaining_after: u64,
        sell_remaining_after: u64,
    },
    /// `(order_id, new_status, new_remaining_quantity)`.
    OrderUpdate {
        order_id: OrderId,
        new_status: OrderStatus,
        new_remaining_quantity: u64,
    },
}

/// Enough broker context to dispatch a webhook without a registry lookup
/// on the flush path.
#[derive(Debug, Clone)]
pub struct WebhookTarget {
    pub broker_id: BrokerId,
    pub webhook_url: Option<String>,
}
