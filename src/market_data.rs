use std::collections::{HashMap, VecDeque};

use crate::instrument::Symbol;

/// Capacity of each symbol's recent-trade ring. Component 5 of the system
/// overview.
pub const RING_CAPACITY: usize = 1000;

pub const DEFAULT_PRICE_WINDOW: usize = 50;
pub const MAX_PRICE_WINDOW: usize = 1000;

/// A bounded FIFO of the most recently executed prices for one symbol.
#[derive(Debug, Default)]
struct Ring {
    prices: VecDeque<u64>,
}

impl Ring {
    fn push(&mut self, price: u64) {
        if self.prices.len() == RING_CAPACITY {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }
}

/// Per-symbol recent-trade rings, backing the `price(symbol, window)` query.
#[derive(Debug, Default)]
pub struct MarketData {
    rings: HashMap<Symbol, Ring>,
}

/// Statistics returned by `price(symbol, window)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceStats {
    pub last_price: u64,
    /// Integer mean, truncated toward zero.
    pub average_price: u64,
    pub trades_in_average: usize,
}

impl MarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_trade(&mut self, symbol: &Symbol, price: u64) {
        self.rings.entry(symbol.clone()).or_default().push(price);
    }

    /// Rehydrates a symbol's ring from recovery, in ascending `executed_at`
    /// order, without going through `record_trade`'s per-push bookkeeping.
    pub fn load_prices(&mut self, symbol: &Symbol, prices: impl IntoIterator<Item = u64>) {
        let ring = self.rings.entry(symbol.clone()).or_default();
        for price in prices {
            ring.push(price);
        }
    }

    pub fn price_stats(&self, symbol: &Symbol, window: usize) -> Option<PriceStats> {
        let ring = self.rings.get(symbol)?;
        let last_price = *ring.prices.back()?;
        let window = window.min(ring.prices.len()).max(1);
        let considered: Vec<u64> = ring
            .prices
            .iter()
            .rev()
            .take(window)
            .copied()
            .collect();
        let trades_in_average = considered.len();
        let sum: u128 = considered.iter().map(|&p| p as u128).sum();
        let average_price = (sum / trades_in_average as u128) as u64;
        Some(PriceStats {
            last_price,
            average_price,
            trades_in_average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[test]
    fn empty_ring_has_no_stats() {
        let md = MarketData::new();
        assert!(md.price_stats(&sym("PETR4"), 50).is_none());
    }

    #[test]
    fn average_truncates_toward_zero() {
        let mut md = MarketData::new();
        md.record_trade(&sym("PETR4"), 10);
        md.record_trade(&sym("PETR4"), 11);

        let stats = md.price_stats(&sym("PETR4"), 50).unwrap();
        assert_eq!(stats.last_price, 11);
        assert_eq!(stats.average_price, 10); // (10+11)/2 = 10 (integer)
        assert_eq!(stats.trades_in_average, 2);
    }

    #[test]
    fn window_limits_trades_considered() {
        let mut md = MarketData::new();
        for price in 1..=5u64 {
            md.record_trade(&sym("PETR4"), price);
        }
        // window=2 should only consider the last two prices: 4, 5
        let stats = md.price_stats(&sym("PETR4"), 2).unwrap();
        assert_eq!(stats.trades_in_average, 2);
        assert_eq!(stats.average_price, 4);
        assert_eq!(stats.last_price, 5);
    }

    #[test]
    fn ring_evicts_oldest_past_capacity() {
        let mut md = MarketData::new();
        for price in 0..(RING_CAPACITY as u64 + 10) {
            md.record_trade(&sym("PETR4"), price);
        }
        let stats = md.price_stats(&sym("PETR4"), MAX_PRICE_WINDOW).unwrap();
        assert_eq!(stats.trades_in_average, RING_CAPACITY);
        assert_eq!(stats.last_price, RING_CAPACITY as u64 + 9);
    }
}
