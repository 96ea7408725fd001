//! The matching core (component 6) plus the order index (component 2) and
//! trade index (component 3) it mutates. Single-writer by construction: the
//! only consumer of `&mut Engine` is whatever holds the outer lock (see
//! `main.rs`, which wraps this in a `tokio::sync::Mutex`).

use std::collections::HashMap;
use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::broker::{BrokerId, BrokerRegistry};
use crate::errors::{LookupError, SubmitError};
use crate::instrument::Symbol;
use crate::ladder::PriceLadder;
use crate::market_data::{MarketData, PriceStats};
use crate::order::{NewOrderRequest, Order, OrderId, OrderStatus, OrderType, Side};
use crate::persistence::events::{PersistEvent, WebhookTarget};
use crate::persistence::pipeline::Pipeline;
use crate::trade::{Trade, TradeId};

/// `(symbol, side) -> ladder` plus `order_id -> order` plus `order_id ->
/// trade ids`. Components 1-3 of the system overview, owned together
/// because matching touches all three atomically.
pub struct Engine {
    ladders: HashMap<(Symbol, Side), PriceLadder>,
    orders: HashMap<OrderId, Order>,
    trades: HashMap<TradeId, Trade>,
    trades_by_order: HashMap<OrderId, Vec<TradeId>>,
    pub brokers: BrokerRegistry,
    pub market_data: MarketData,
    pipeline: Pipeline,
}

/// Aggregated book levels returned by [`Engine::order_book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLevels {
    pub asks: Vec<(u64, u64, usize)>,
    pub bids: Vec<(u64, u64, usize)>,
}

pub const DEFAULT_BOOK_DEPTH: usize = 10;
pub const MAX_BOOK_DEPTH: usize = 50;

impl Engine {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            ladders: HashMap::new(),
            orders: HashMap::new(),
            trades: HashMap::new(),
            trades_by_order: HashMap::new(),
            brokers: BrokerRegistry::new(),
            market_data: MarketData::new(),
            pipeline,
        }
    }

    fn ladder_mut(&mut self, symbol: &Symbol, side: Side) -> &mut PriceLadder {
        self.ladders
            .entry((symbol.clone(), side))
            .or_insert_with(|| PriceLadder::new(side))
    }

    /// Rehydrates one order directly into the index and, if it still rests,
    /// into its ladder. Used exclusively by recovery, which has already
    /// filtered to `status=open` orders in `created_at` order.
    pub fn load_order(&mut self, order: Order) {
        let now = SystemTime::now();
        if order.rests_in_ladder(now) {
            self.ladder_mut(&order.symbol, order.side)
                .insert(order.price.expect("limit order has a price"), order.id);
        }
        self.orders.insert(order.id, order);
    }

    /// Rehydrates a trade into the trade index, without re-deriving balances
    /// or the recent-trade ring (recovery does those separately).
    pub fn load_trade(&mut self, trade: Trade) {
        self.trades_by_order
            .entry(trade.buy_order_id)
            .or_default()
            .push(trade.id);
        self.trades_by_order
            .entry(trade.sell_order_id)
            .or_default()
            .push(trade.id);
        self.trades.insert(trade.id, trade);
    }

    fn validate(req: &NewOrderRequest) -> Result<(), SubmitError> {
        if !req.symbol.is_tradable() {
            return Err(SubmitError::UnknownSymbol(req.symbol.as_str().to_string()));
        }
        if req.quantity == 0 {
            return Err(SubmitError::ZeroQuantity);
        }
        match req.order_type {
            OrderType::Limit => {
                if req.price.is_none_or(|p| p == 0) {
                    return Err(SubmitError::MissingOrInvalidPrice);
                }
                match req.valid_until {
                    Some(valid_until) if valid_until > SystemTime::now() => {}
                    _ => return Err(SubmitError::MissingOrPastExpiry),
                }
            }
            OrderType::Market => {
                if req.price.is_some() {
                    return Err(SubmitError::UnexpectedPrice);
                }
            }
        }
        Ok(())
    }

    /// Entry point for order submission. Assigns identity, runs the match
    /// loop against the opposite ladder, applies fills, and either rests or
    /// discards the remainder. Returns the new order's id and the trades it
    /// produced as aggressor.
    pub fn submit_order(
        &mut self,
        req: NewOrderRequest,
    ) -> Result<(OrderId, Vec<Trade>), SubmitError> {
        Self::validate(&req)?;
        if self.brokers.get(req.broker_id).is_none() {
            return Err(SubmitError::UnknownBroker);
        }

        let now = SystemTime::now();
        let mut order = Order {
            id: Uuid::new_v4().as_u128(),
            broker_id: req.broker_id,
            document_number: req.document_number,
            side: req.side,
            order_type: req.order_type,
            symbol: req.symbol,
            price: req.price,
            quantity: req.quantity,
            remaining_quantity: req.quantity,
            valid_until: req.valid_until,
            status: OrderStatus::Open,
            created_at: now,
        };

        // Snapshot taken before the match loop begins: durable history must
        // record the order as submitted, not as left after trading.
        self.pipeline
            .enqueue(PersistEvent::NewOrder(Box::new(order.clone())));

        let trades = self.run_match_loop(&mut order, now);

        if order.remaining_quantity == 0 {
            order.status = OrderStatus::Filled;
        } else if order.order_type == OrderType::Market {
            // IOC: an unfilled market remainder is discarded, never rested.
            order.status = OrderStatus::Cancelled;
        } else {
            self.ladder_mut(&order.symbol, order.side)
                .insert(order.price.expect("limit order has a price"), order.id);
        }

        if order.status != OrderStatus::Open {
            self.pipeline.enqueue(PersistEvent::OrderUpdate {
                order_id: order.id,
                new_status: order.status,
                new_remaining_quantity: order.remaining_quantity,
            });
        }

        let id = order.id;
        self.orders.insert(id, order);
        Ok((id, trades))
    }

    /// Repeatedly draws the best resting candidate, purges lazy
    /// expirations, tests crossing, and executes trades until the aggressor
    /// is filled or nothing left crosses. Runs to completion without an
    /// `.await` point, so it can never be suspended mid-cascade.
    fn run_match_loop(&mut self, aggressor: &mut Order, now: SystemTime) -> Vec<Trade> {
        let mut trades = Vec::new();
        let opposite = aggressor.side.opposite();

        loop {
            if aggressor.remaining_quantity == 0 {
                break;
            }
            let Some(candidate_id) = self
                .ladders
                .get(&(aggressor.symbol.clone(), opposite))
                .and_then(PriceLadder::peek_best)
            else {
                break;
            };

            // Lazily expire the candidate if its validity has lapsed,
            // regardless of whether it would have crossed.
            let Some((candidate_price, is_expired)) = self
                .orders
                .get(&candidate_id)
                .map(|o| (o.price, o.is_expired(now)))
            else {
                break;
            };
            if is_expired {
                self.ladder_mut(&aggressor.symbol, opposite)
                    .remove(candidate_id);
                let remaining = {
                    let candidate = self
                        .orders
                        .get_mut(&candidate_id)
                        .expect("candidate came from the ladder, must be indexed");
                    candidate.status = OrderStatus::Expired;
                    candidate.remaining_quantity
                };
                self.pipeline.enqueue(PersistEvent::OrderUpdate {
                    order_id: candidate_id,
                    new_status: OrderStatus::Expired,
                    new_remaining_quantity: remaining,
                });
                continue;
            }

            let Some(candidate_price) = candidate_price else {
                break;
            };
            let crosses = match aggressor.side {
                Side::Bid => aggressor.order_type == OrderType::Market || aggressor.price.is_some_and(|p| p >= candidate_price),
                Side::Ask => aggressor.order_type == OrderType::Market || aggressor.price.is_some_and(|p| p <= candidate_price),
            };
            if !crosses {
                break;
            }

            let candidate_remaining = self
                .orders
                .get(&candidate_id)
                .map(|o| o.remaining_quantity)
                .unwrap_or(0);
            let qty = aggressor.remaining_quantity.min(candidate_remaining);

            let (buy_order_id, sell_order_id) = match aggressor.side {
                Side::Bid => (aggressor.id, candidate_id),
                Side::Ask => (candidate_id, aggressor.id),
            };

            aggressor.remaining_quantity -= qty;
            let (candidate_remaining_after, candidate_filled) = {
                let candidate = self
                    .orders
                    .get_mut(&candidate_id)
                    .expect("candidate came from the ladder, must be indexed");
                candidate.remaining_quantity -= qty;
                let filled = candidate.remaining_quantity == 0;
                if filled {
                    candidate.status = OrderStatus::Filled;
                }
                (candidate.remaining_quantity, filled)
            };
            if candidate_filled {
                self.ladder_mut(&aggressor.symbol, opposite).remove(candidate_id);
                self.pipeline.enqueue(PersistEvent::OrderUpdate {
                    order_id: candidate_id,
                    new_status: OrderStatus::Filled,
                    new_remaining_quantity: 0,
                });
            } else {
                self.pipeline.enqueue(PersistEvent::OrderUpdate {
                    order_id: candidate_id,
                    new_status: OrderStatus::Open,
                    new_remaining_quantity: candidate_remaining_after,
                });
            }

            let trade = Trade {
                id: Uuid::new_v4().as_u128(),
                symbol: aggressor.symbol.clone(),
                buy_order_id,
                sell_order_id,
                price: candidate_price,
                quantity: qty,
                executed_at: now,
            };

            let buyer_id = self
                .orders
                .get(&buy_order_id)
                .map(|o| o.broker_id)
                .unwrap_or(aggressor.broker_id);
            let seller_id = self
                .orders
                .get(&sell_order_id)
                .map(|o| o.broker_id)
                .unwrap_or(aggressor.broker_id);
            // aggressor may not be indexed yet, so fall back to its own field
            let buyer_id = if buy_order_id == aggressor.id { aggressor.broker_id } else { buyer_id };
            let seller_id = if sell_order_id == aggressor.id { aggressor.broker_id } else { seller_id };

            let notional = trade.price as i64 * trade.quantity as i64;
            self.brokers.apply_delta(buyer_id, -notional);
            self.brokers.apply_delta(seller_id, notional);
            self.market_data.record_trade(&trade.symbol, trade.price);

            let buy_remaining_after = if buy_order_id == aggressor.id {
                aggressor.remaining_quantity
            } else {
                candidate_remaining_after
            };
            let sell_remaining_after = if sell_order_id == aggressor.id {
                aggressor.remaining_quantity
            } else {
                candidate_remaining_after
            };

            self.pipeline.enqueue(PersistEvent::Trade {
                trade: trade.clone(),
                buy_broker: WebhookTarget {
                    broker_id: buyer_id,
                    webhook_url: self.brokers.get(buyer_id).and_then(|b| b.webhook_url.clone()),
                },
                sell_broker: WebhookTarget {
                    broker_id: seller_id,
                    webhook_url: self.brokers.get(seller_id).and_then(|b| b.webhook_url.clone()),
                },
                buy_remaining_after,
                sell_remaining_after,
            });

            self.trades_by_order.entry(buy_order_id).or_default().push(trade.id);
            self.trades_by_order.entry(sell_order_id).or_default().push(trade.id);
            self.trades.insert(trade.id, trade.clone());
            trades.push(trade);

            info!(
                symbol = %aggressor.symbol,
                qty,
                price = candidate_price,
                "trade executed"
            );
        }

        trades
    }

    /// Cancel: a silent no-op unless the order is open, limit-typed, and
    /// owned by `broker_id`.
    pub fn cancel_order(&mut self, broker_id: BrokerId, order_id: OrderId) {
        let Some(order) = self.orders.get(&order_id) else {
            return;
        };
        if order.broker_id != broker_id
            || order.status != OrderStatus::Open
            || order.order_type != OrderType::Limit
        {
            return;
        }
        let symbol = order.symbol.clone();
        let side = order.side;
        self.ladder_mut(&symbol, side).remove(order_id);
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.status = OrderStatus::Cancelled;
        }
        self.pipeline.enqueue(PersistEvent::OrderUpdate {
            order_id,
            new_status: OrderStatus::Cancelled,
            new_remaining_quantity: self
                .orders
                .get(&order_id)
                .map(|o| o.remaining_quantity)
                .unwrap_or(0),
        });
    }

    /// Memory-first lookup with a lazy-expiration check.
    /// The durable fallback for pre-restart orders lives in `recovery`'s
    /// caller (`Engine` has no store handle of its own — see DESIGN.md).
    pub fn lookup(&mut self, order_id: OrderId) -> Option<(Order, Vec<Trade>)> {
        let now = SystemTime::now();
        if let Some(order) = self.orders.get(&order_id) {
            if order.status == OrderStatus::Open && order.is_expired(now) {
                let symbol = order.symbol.clone();
                let side = order.side;
                self.ladder_mut(&symbol, side).remove(order_id);
                if let Some(order) = self.orders.get_mut(&order_id) {
                    order.status = OrderStatus::Expired;
                }
                self.pipeline.enqueue(PersistEvent::OrderUpdate {
                    order_id,
                    new_status: OrderStatus::Expired,
                    new_remaining_quantity: self
                        .orders
                        .get(&order_id)
                        .map(|o| o.remaining_quantity)
                        .unwrap_or(0),
                });
            }
        }
        let order = self.orders.get(&order_id)?.clone();
        let trades = self
            .trades_by_order
            .get(&order_id)
            .map(|ids| ids.iter().filter_map(|id| self.trades.get(id).cloned()).collect())
            .unwrap_or_default();
        Some((order, trades))
    }

    pub fn has_order_record(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Returns `None` if the
    /// symbol has never had a ladder created for either side (i.e. never
    /// rested an order) *and* no trade history exists for it.
    pub fn order_book(&self, symbol: &Symbol, depth: usize) -> Option<BookLevels> {
        let depth = depth.clamp(1, MAX_BOOK_DEPTH);
        let has_ladder = self.ladders.contains_key(&(symbol.clone(), Side::Bid))
            || self.ladders.contains_key(&(symbol.clone(), Side::Ask));
        let has_traded = self.market_data.price_stats(symbol, 1).is_some();
        if !has_ladder && !has_traded {
            return None;
        }
        let now = SystemTime::now();
        let remaining_of = |id: OrderId| {
            self.orders
                .get(&id)
                .filter(|o| !o.is_expired(now))
                .map(|o| o.remaining_quantity)
                .unwrap_or(0)
        };
        let asks = self
            .ladders
            .get(&(symbol.clone(), Side::Ask))
            .map(|l| l.aggregate_levels(depth, remaining_of))
            .unwrap_or_default();
        let bids = self
            .ladders
            .get(&(symbol.clone(), Side::Bid))
            .map(|l| l.aggregate_levels(depth, remaining_of))
            .unwrap_or_default();
        Some(BookLevels { asks, bids })
    }

    pub fn price(&self, symbol: &Symbol, window: usize) -> Option<PriceStats> {
        self.market_data.price_stats(symbol, window)
    }

    pub fn balance(&self, broker_id: BrokerId) -> Option<i64> {
        self.brokers.balance(broker_id)
    }

    pub fn register_broker(
        &mut self,
        name: String,
        webhook_url: Option<String>,
    ) -> (crate::broker::Broker, String) {
        let (broker, api_key) = self.brokers.register(name, webhook_url);
        self.pipeline
            .enqueue(PersistEvent::NewBroker(Box::new(broker.clone())));
        (broker, api_key)
    }
}

/// Raised by `get_order` at the outer layer once it has the looked-up
/// order in hand and can compare ownership. Kept here (rather than folded
/// into `lookup`) because forbidden-on-read is explicitly an *outer-layer*
/// policy, not a core-engine concern.
pub fn enforce_ownership(order: &Order, broker_id: BrokerId) -> Result<(), LookupError> {
    if order.broker_id != broker_id {
        warn!(order_id = order.id, "order lookup rejected: owner mismatch");
        return Err(LookupError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::pipeline::Pipeline;
    use std::time::Duration;

    fn engine() -> Engine {
        let (pipeline, _rx) = Pipeline::new(1024, 256);
        Engine::new(pipeline)
    }

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn register(engine: &mut Engine, name: &str) -> BrokerId {
        engine.register_broker(name.to_string(), None).0.id
    }

    fn limit_req(
        broker_id: BrokerId,
        side: Side,
        price: u64,
        qty: u64,
        symbol: &str,
    ) -> NewOrderRequest {
        NewOrderRequest {
            broker_id,
            document_number: "DOC".into(),
            side,
            order_type: OrderType::Limit,
            symbol: sym(symbol),
            price: Some(price),
            quantity: qty,
            valid_until: Some(SystemTime::now() + Duration::from_secs(3600)),
        }
    }

    fn market_req(broker_id: BrokerId, side: Side, qty: u64, symbol: &str) -> NewOrderRequest {
        NewOrderRequest {
            broker_id,
            document_number: "DOC".into(),
            side,
            order_type: OrderType::Market,
            symbol: sym(symbol),
            price: None,
            quantity: qty,
            valid_until: None,
        }
    }

    /// S1: basic match at resting (ask) price.
    #[test]
    fn s1_basic_match_at_resting_price() {
        let mut engine = engine();
        let seller = register(&mut engine, "seller");
        let buyer = register(&mut engine, "buyer");

        let (ask_id, _) = engine
            .submit_order(limit_req(seller, Side::Ask, 3500, 100, "PETR4"))
            .unwrap();
        let (bid_id, trades) = engine
            .submit_order(limit_req(buyer, Side::Bid, 3510, 100, "PETR4"))
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 3500);
        assert_eq!(trades[0].quantity, 100);
        assert_eq!(engine.lookup(ask_id).unwrap().0.status, OrderStatus::Filled);
        assert_eq!(engine.lookup(bid_id).unwrap().0.status, OrderStatus::Filled);
        assert!(engine.order_book(&sym("PETR4"), 5).unwrap().asks.is_empty());
        assert_eq!(engine.balance(buyer), Some(-350_000));
        assert_eq!(engine.balance(seller), Some(350_000));
    }

    /// S2: partial fill against two resting counterparties, in time order.
    #[test]
    fn s2_partial_fill_multi_counterparty() {
        let mut engine = engine();
        let seller = register(&mut engine, "seller");
        let buyer = register(&mut engine, "buyer");

        let (a1, _) = engine
            .submit_order(limit_req(seller, Side::Ask, 3500, 60, "PETR4"))
            .unwrap();
        let (a2, _) = engine
            .submit_order(limit_req(seller, Side::Ask, 3500, 50, "PETR4"))
            .unwrap();
        let (_, trades) = engine
            .submit_order(limit_req(buyer, Side::Bid, 3500, 100, "PETR4"))
            .unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].sell_order_id, a1);
        assert_eq!(trades[0].quantity, 60);
        assert_eq!(trades[1].sell_order_id, a2);
        assert_eq!(trades[1].quantity, 40);
        assert_eq!(engine.lookup(a1).unwrap().0.status, OrderStatus::Filled);
        let (a2_order, _) = engine.lookup(a2).unwrap();
        assert_eq!(a2_order.status, OrderStatus::Open);
        assert_eq!(a2_order.remaining_quantity, 10);
    }

    /// S3: price-time tie-break — earlier resting order at the same price wins.
    #[test]
    fn s3_price_time_tie_break() {
        let mut engine = engine();
        let seller = register(&mut engine, "seller");
        let buyer = register(&mut engine, "buyer");

        let (a1, _) = engine
            .submit_order(limit_req(seller, Side::Ask, 3500, 50, "PETR4"))
            .unwrap();
        let (a2, _) = engine
            .submit_order(limit_req(seller, Side::Ask, 3500, 50, "PETR4"))
            .unwrap();
        let (_, trades) = engine
            .submit_order(limit_req(buyer, Side::Bid, 3500, 50, "PETR4"))
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sell_order_id, a1);
        assert_eq!(engine.lookup(a2).unwrap().0.remaining_quantity, 50);
    }

    /// S4: IOC remainder of a market order is discarded, never rested.
    #[test]
    fn s4_market_order_ioc_remainder_dropped() {
        let mut engine = engine();
        let seller = register(&mut engine, "seller");
        let buyer = register(&mut engine, "buyer");

        engine
            .submit_order(limit_req(seller, Side::Ask, 3500, 30, "PETR4"))
            .unwrap();
        let (bid_id, trades) = engine
            .submit_order(market_req(buyer, Side::Bid, 100, "PETR4"))
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 30);
        let (order, _) = engine.lookup(bid_id).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.remaining_quantity, 70);
        assert!(engine.order_book(&sym("PETR4"), 5).unwrap().bids.is_empty());
    }

    /// S5: a non-crossing limit order rests as a single level.
    #[test]
    fn s5_non_crossing_limit_rests() {
        let mut engine = engine();
        let buyer = register(&mut engine, "buyer");

        let (_, trades) = engine
            .submit_order(limit_req(buyer, Side::Bid, 3400, 100, "PETR4"))
            .unwrap();
        assert!(trades.is_empty());

        let book = engine.order_book(&sym("PETR4"), 5).unwrap();
        assert_eq!(book.bids[0], (3400, 100, 1));
    }

    /// S6: expiration discovered mid-match — the expired ask is purged and
    /// the incoming bid, now facing an empty book, rests instead of crossing.
    #[test]
    fn s6_expiration_discovered_during_match() {
        let mut engine = engine();
        let seller = register(&mut engine, "seller");
        let buyer = register(&mut engine, "buyer");

        let expired_req = NewOrderRequest {
            valid_until: Some(SystemTime::now() - Duration::from_secs(1)),
            ..limit_req(seller, Side::Ask, 3500, 100, "PETR4")
        };
        let (ask_id, _) = engine.submit_order(expired_req).unwrap();
        let (bid_id, trades) = engine
            .submit_order(limit_req(buyer, Side::Bid, 3500, 100, "PETR4"))
            .unwrap();

        assert!(trades.is_empty());
        assert_eq!(engine.lookup(ask_id).unwrap().0.status, OrderStatus::Expired);
        assert_eq!(engine.lookup(bid_id).unwrap().0.status, OrderStatus::Open);
    }

    #[test]
    fn cancel_is_idempotent_and_silent_on_foreign_order() {
        let mut engine = engine();
        let owner = register(&mut engine, "owner");
        let stranger = register(&mut engine, "stranger");

        let (order_id, _) = engine
            .submit_order(limit_req(owner, Side::Bid, 3400, 100, "PETR4"))
            .unwrap();

        engine.cancel_order(stranger, order_id);
        assert_eq!(engine.lookup(order_id).unwrap().0.status, OrderStatus::Open);

        engine.cancel_order(owner, order_id);
        assert_eq!(engine.lookup(order_id).unwrap().0.status, OrderStatus::Cancelled);

        // second cancel: indistinguishable no-op
        engine.cancel_order(owner, order_id);
        assert_eq!(engine.lookup(order_id).unwrap().0.status, OrderStatus::Cancelled);
    }

    #[test]
    fn self_match_is_permitted() {
        let mut engine = engine();
        let broker = register(&mut engine, "same-broker");

        engine
            .submit_order(limit_req(broker, Side::Ask, 3500, 50, "PETR4"))
            .unwrap();
        let (_, trades) = engine
            .submit_order(limit_req(broker, Side::Bid, 3500, 50, "PETR4"))
            .unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(engine.balance(broker), Some(0));
    }

    #[test]
    fn validation_rejects_zero_quantity_and_unknown_symbol() {
        let mut engine = engine();
        let broker = register(&mut engine, "broker");

        let mut bad = limit_req(broker, Side::Bid, 3400, 0, "PETR4");
        assert_eq!(
            engine.submit_order(bad.clone()).unwrap_err(),
            SubmitError::ZeroQuantity
        );

        bad.quantity = 10;
        bad.symbol = sym("ZZZZ1");
        assert!(matches!(
            engine.submit_order(bad).unwrap_err(),
            SubmitError::UnknownSymbol(_)
        ));
    }
}
