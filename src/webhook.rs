//! Post-commit webhook dispatch for executed trades.
//!
//! Uses the same `reqwest::Client` style as the demo bots, redirected at
//! outbound delivery instead of inbound order submission. Delivery is
//! at-most-once and best-effort:
//! failures are logged, never retried, never surfaced to the submitting
//! broker.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::warn;

use crate::order::OrderId;
use crate::trade::Trade;

/// A thin wrapper so call sites don't reach for `reqwest::Client` directly;
/// keeps the timeout policy in one place.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client builds with a plain timeout");
        Self { client }
    }
}

/// Payload shape delivered to a broker's registered webhook endpoint.
#[derive(Debug, Serialize)]
struct TradeExecutedPayload {
    event: &'static str,
    trade_id: String,
    order_id: String,
    symbol: String,
    side: &'static str,
    price: u64,
    quantity: u64,
    order_remaining_quantity: u64,
    executed_at: u128,
}

fn to_unix_nanos(ts: SystemTime) -> u128 {
    ts.duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0)
}

/// Dispatches the `trade_executed` webhook for one side of a trade. Logs
/// and returns on any failure; never retried, never propagated to the caller.
pub async fn dispatch(
    client: &WebhookClient,
    url: &str,
    trade: &Trade,
    order_id: OrderId,
    side: &'static str,
    order_remaining_quantity: u64,
) {
    let payload = TradeExecutedPayload {
        event: "trade_executed",
        trade_id: trade.id.to_string(),
        order_id: order_id.to_string(),
        symbol: trade.symbol.as_str().to_string(),
        side,
        price: trade.price,
        quantity: trade.quantity,
        order_remaining_quantity,
        executed_at: to_unix_nanos(trade.executed_at),
    };

    match client.client.post(url).json(&payload).send().await {
        Ok(resp) if resp.status().is_success() => {}
        Ok(resp) => {
            warn!(status = %resp.status(), url, "webhook delivery rejected");
        }
        Err(e) => {
            warn!(error = %e, url, "webhook delivery failed");
        }
    }
}
