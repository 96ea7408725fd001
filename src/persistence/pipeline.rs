//! The bounded queue plus periodic flusher sitting between the matching
//! core and the durable store.
//!
//! [`Pipeline`] is the producer half, held by [`crate::engine::Engine`] and
//! called synchronously (`try_send`, never `.await`) from inside the match
//! loop, so enqueueing a trade or order-update event can never introduce a
//! suspension point into the non-cancellable match cascade.
//! [`run_flusher`] is the consumer half: a background task that wakes on a
//! fixed interval or a batch-size notification, whichever comes first, and
//! commits a coalesced batch in a fixed order: new orders, then trades,
//! then status updates, then balance deltas.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::order::{OrderId, OrderStatus};
use crate::persistence::events::PersistEvent;
use crate::persistence::store::Store;
use crate::webhook::{self, WebhookClient};

/// Producer handle: wraps a bounded `mpsc::Sender` plus the notify used to
/// wake the flusher early once a batch threshold is crossed.
#[derive(Clone)]
pub struct Pipeline {
    tx: mpsc::Sender<PersistEvent>,
    capacity: usize,
    batch_threshold: usize,
    notify: Arc<Notify>,
}

impl Pipeline {
    /// Builds a connected producer/consumer pair. The receiver half is
    /// handed to [`run_flusher`] by the caller (`main.rs`).
    pub fn new(capacity: usize, batch_threshold: usize) -> (Self, mpsc::Receiver<PersistEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let pipeline = Self {
            tx,
            capacity: capacity.max(1),
            batch_threshold,
            notify: Arc::new(Notify::new()),
        };
        (pipeline, rx)
    }

    /// Non-blocking enqueue. A full queue is the accepted ~1-batch data-loss
    /// window this design accepts: the event is dropped and logged rather than
    /// backpressuring the match loop.
    pub fn enqueue(&self, event: PersistEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {
                let in_flight = self.capacity - self.tx.capacity();
                if in_flight >= self.batch_threshold {
                    self.notify.notify_one();
                }
            }
            Err(TrySendError::Full(_)) => {
                warn!("persistence queue full, dropping event (accepted data-loss window)");
            }
            Err(TrySendError::Closed(_)) => {
                error!("persistence queue closed, flusher has shut down");
            }
        }
    }

    fn notify_handle(&self) -> Arc<Notify> {
        self.notify.clone()
    }
}

/// A coalesced batch ready for a single durable transaction: grouped by
/// kind, `OrderUpdate`s deduplicated per order id
/// keeping only the last (status transitions are monotonic toward
/// terminal, so the latest write is always the authoritative one).
#[derive(Default)]
struct Batch {
    new_brokers: Vec<crate::broker::Broker>,
    new_orders: Vec<crate::order::Order>,
    trades: Vec<PendingTrade>,
    updates: HashMap<OrderId, (OrderStatus, u64)>,
}

struct PendingTrade {
    trade: crate::trade::Trade,
    buy_broker: crate::persistence::events::WebhookTarget,
    sell_broker: crate::persistence::events::WebhookTarget,
    buy_remaining_after: u64,
    sell_remaining_after: u64,
}

impl Batch {
    fn push(&mut self, event: PersistEvent) {
        match event {
            PersistEvent::NewBroker(broker) => self.new_brokers.push(*broker),
            PersistEvent::NewOrder(order) => self.new_orders.push(*order),
            PersistEvent::Trade {
                trade,
                buy_broker,
                sell_broker,
                buy_remaining_after,
                sell_remaining_after,
            } => self.trades.push(PendingTrade {
                trade,
                buy_broker,
                sell_broker,
                buy_remaining_after,
                sell_remaining_after,
            }),
            PersistEvent::OrderUpdate {
                order_id,
                new_status,
                new_remaining_quantity,
            } => {
                self.updates.insert(order_id, (new_status, new_remaining_quantity));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.new_brokers.is_empty()
            && self.new_orders.is_empty()
            && self.trades.is_empty()
            && self.updates.is_empty()
    }
}

/// Drains up to `max_batch` already-queued events (never waits for more).
fn drain(rx: &mut mpsc::Receiver<PersistEvent>, max_batch: usize) -> Batch {
    let mut batch = Batch::default();
    let mut drained = 0;
    while drained < max_batch {
        match rx.try_recv() {
            Ok(event) => {
                batch.push(event);
                drained += 1;
            }
            Err(_) => break,
        }
    }
    batch
}

/// Commits one batch within a single durable transaction, in the fixed
/// order: new orders, then trades, then status updates, then balance
/// deltas. Balance deltas are computed from the trades in *this* batch only.
async fn commit_batch(store: &Store, batch: &Batch) -> Result<(), crate::persistence::store::StoreError> {
    for broker in &batch.new_brokers {
        store.insert_broker(broker)?;
    }
    for order in &batch.new_orders {
        store.insert_new_order(order)?;
    }
    for pending in &batch.trades {
        store.insert_trade(&pending.trade)?;
    }
    for (&order_id, &(status, remaining)) in &batch.updates {
        store.update_order(order_id, |o| {
            o.status = status;
            o.remaining_quantity = remaining;
        })?;
    }

    let mut deltas: HashMap<crate::broker::BrokerId, i64> = HashMap::new();
    for pending in &batch.trades {
        let notional = pending.trade.price as i64 * pending.trade.quantity as i64;
        *deltas.entry(pending.buy_broker.broker_id).or_insert(0) -= notional;
        *deltas.entry(pending.sell_broker.broker_id).or_insert(0) += notional;
    }
    for (broker_id, delta) in deltas {
        store.update_broker_balance(broker_id, delta)?;
    }

    Ok(())
}

/// The background flusher task. Runs until `shutdown` fires.
/// On a commit failure the batch is logged and retried verbatim on the
/// next wake — memory stays authoritative and no event is dropped purely
/// because of a transient durability failure.
pub async fn run_flusher(
    pipeline: Pipeline,
    mut rx: mpsc::Receiver<PersistEvent>,
    store: Arc<Store>,
    webhook_client: WebhookClient,
    flush_interval: Duration,
    batch_threshold: usize,
    shutdown: CancellationToken,
) {
    let notify = pipeline.notify_handle();
    let mut interval = tokio::time::interval(flush_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut pending: Option<Batch> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = notify.notified() => {}
            _ = shutdown.cancelled() => {
                // final drain so a clean shutdown doesn't lose the tail batch
                let mut batch = pending.take().unwrap_or_default();
                let drained = drain(&mut rx, usize::MAX);
                merge(&mut batch, drained);
                if !batch.is_empty() {
                    if let Err(e) = commit_batch(&store, &batch).await {
                        error!(error = %e, "final flush failed during shutdown");
                    } else {
                        dispatch_webhooks(&webhook_client, &batch).await;
                    }
                }
                break;
            }
        }

        let mut batch = pending.take().unwrap_or_default();
        let drained = drain(&mut rx, batch_threshold.max(1) * 4);
        merge(&mut batch, drained);

        if batch.is_empty() {
            continue;
        }

        match commit_batch(&store, &batch).await {
            Ok(()) => {
                debug!(
                    orders = batch.new_orders.len(),
                    trades = batch.trades.len(),
                    updates = batch.updates.len(),
                    "flush committed"
                );
                dispatch_webhooks(&webhook_client, &batch).await;
            }
            Err(e) => {
                error!(error = %e, "flush transaction aborted, retrying next tick");
                pending = Some(batch);
            }
        }
    }
}

fn merge(batch: &mut Batch, other: Batch) {
    batch.new_brokers.extend(other.new_brokers);
    batch.new_orders.extend(other.new_orders);
    batch.trades.extend(other.trades);
    for (id, update) in other.updates {
        batch.updates.insert(id, update);
    }
}

/// Fire-and-forget webhook dispatch for every trade in a just-committed
/// batch, one call per participating broker with a registered endpoint.
async fn dispatch_webhooks(client: &WebhookClient, batch: &Batch) {
    for pending in &batch.trades {
        if let Some(url) = &pending.buy_broker.webhook_url {
            webhook::dispatch(
                client,
                url,
                &pending.trade,
                pending.trade.buy_order_id,
                "bid",
                pending.buy_remaining_after,
            )
            .await;
        }
        if let Some(url) = &pending.sell_broker.webhook_url {
            webhook::dispatch(
                client,
                url,
                &pending.trade,
                pending.trade.sell_order_id,
                "ask",
                pending.sell_remaining_after,
            )
            .await;
        }
    }
}
