//! Rehydrates the ladders, order index, trade index, broker registry, and
//! recent-trade rings from the durable store at startup, before any
//! request is admitted. The inverse of the persistence pipeline.

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::info;

use crate::engine::Engine;
use crate::market_data::RING_CAPACITY;
use crate::order::OrderStatus;
use crate::persistence::store::{Store, StoreResult};

/// Rehydrates brokers, then open orders, then the trades that reference
/// them, then the per-symbol recent-trade rings, against `engine`.
/// Starting the persistence flusher afterward is the caller's job
/// (`main.rs`), since it spawns a task rather than mutating memory.
pub fn recover(store: &Store, engine: &mut Engine) -> StoreResult<()> {
    let brokers = store.all_brokers()?;
    info!(count = brokers.len(), "recovery: loading brokers");
    for broker in brokers {
        engine.brokers.insert(broker);
    }

    let now = SystemTime::now();
    let mut open_orders: Vec<_> = store
        .all_orders()?
        .into_iter()
        .filter(|o| o.status == OrderStatus::Open && o.valid_until.is_some_and(|v| v > now))
        .collect();
    // Ascending created_at preserves time priority within each price level.
    open_orders.sort_by_key(|o| o.created_at);
    info!(count = open_orders.len(), "recovery: loading open orders");
    let loaded_ids: HashSet<_> = open_orders.iter().map(|o| o.id).collect();
    for order in open_orders {
        engine.load_order(order);
    }

    let all_trades = store.all_trades()?;
    let relevant_trades: Vec<_> = all_trades
        .iter()
        .filter(|t| loaded_ids.contains(&t.buy_order_id) || loaded_ids.contains(&t.sell_order_id))
        .cloned()
        .collect();
    info!(count = relevant_trades.len(), "recovery: loading trade index");
    for trade in relevant_trades {
        engine.load_trade(trade);
    }

    let mut by_symbol: std::collections::HashMap<String, Vec<_>> = std::collections::HashMap::new();
    for trade in all_trades {
        by_symbol
            .entry(trade.symbol.as_str().to_string())
            .or_default()
            .push(trade);
    }
    for (_symbol, mut trades) in by_symbol {
        trades.sort_by_key(|t| t.executed_at);
        if trades.len() > RING_CAPACITY {
            let drop = trades.len() - RING_CAPACITY;
            trades.drain(0..drop);
        }
        if let Some(symbol) = trades.first().map(|t| t.symbol.clone()) {
            engine
                .market_data
                .load_prices(&symbol, trades.iter().map(|t| t.price));
        }
    }

    Ok(())
}
