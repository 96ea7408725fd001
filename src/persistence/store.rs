use std::path::Path;

use bincode::config::{self, standard};
use bincode::error::{DecodeError, EncodeError};
use parity_db::{ColId, Db, Options};
use thiserror::Error;

use crate::broker::{Broker, BrokerId};
use crate::order::{Order, OrderId};
use crate::trade::Trade;

const COL_BROKERS: ColId = 0;
const COL_ORDERS: ColId = 1;
const COL_TRADES: ColId = 2;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ParityDB error: {0}")]
    Parity(#[from] parity_db::Error),
    #[error("Bincode encode error: {0}")]
    BincodeEncode(#[from] EncodeError),
    #[error("Bincode decode error: {0}")]
    BincodeDecode(#[from] DecodeError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The durable store backing recovery and the persistence pipeline.
///
/// Logical layout: three ParityDB column families keyed by big-endian id
/// bytes, for stable iteration order. Ordering is only needed at recovery
/// time (see `Store::all_orders`/`all_trades`), which tolerates an
/// in-memory sort rather than a composite on-disk key.
pub struct Store {
    db: Db,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let mut opts = Options::with_columns(path.as_ref(), 3);
        opts.columns[COL_BROKERS as usize].btree_index = true;
        opts.columns[COL_ORDERS as usize].btree_index = true;
        opts.columns[COL_TRADES as usize].btree_index = true;
        let db = Db::open_or_create(&opts)?;
        Ok(Store { db })
    }

    fn id_key(id: u128) -> Vec<u8> {
        id.to_be_bytes().to_vec()
    }

    pub fn insert_broker(&self, broker: &Broker) -> StoreResult<()> {
        let value = bincode::encode_to_vec(broker, standard())?;
        self.db
            .commit(vec![(COL_BROKERS, Self::id_key(broker.id), Some(value))])?;
        Ok(())
    }

    pub fn all_brokers(&self) -> StoreResult<Vec<Broker>> {
        let cfg = config::standard();
        let mut iter = self.db.iter(COL_BROKERS)?;
        iter.seek_to_first()?;
        let mut out = Vec::new();
        while let Some((_key, raw)) = iter.next()? {
            let (decoded, _): (Broker, usize) = bincode::decode_from_slice(&raw, cfg)?;
            out.push(decoded);
        }
        Ok(out)
    }

    pub fn insert_new_order(&self, order: &Order) -> StoreResult<()> {
        let value = bincode::encode_to_vec(order, standard())?;
        self.db
            .commit(vec![(COL_ORDERS, Self::id_key(order.id), Some(value))])?;
        Ok(())
    }

    pub fn update_order(
        &self,
        order_id: OrderId,
        mutate: impl FnOnce(&mut Order),
    ) -> StoreResult<()> {
        let key = Self::id_key(order_id);
        let Some(raw) = self.db.get(COL_ORDERS, &key)? else {
            return Ok(());
        };
        let (mut order, _): (Order, usize) = bincode::decode_from_slice(&raw, standard())?;
        mutate(&mut order);
        let value = bincode::encode_to_vec(&order, standard())?;
        self.db.commit(vec![(COL_ORDERS, key, Some(value))])?;
        Ok(())
    }

    pub fn all_orders(&self) -> StoreResult<Vec<Order>> {
        let cfg = config::standard();
        let mut iter = self.db.iter(COL_ORDERS)?;
        iter.seek_to_first()?;
        let mut out = Vec::new();
        while let Some((_key, raw)) = iter.next()? {
            let (decoded, _): (Order, usize) = bincode::decode_from_slice(&raw, cfg)?;
            out.push(decoded);
        }
        Ok(out)
    }

    pub fn insert_trade(&self, trade: &Trade) -> StoreResult<()> {
        let value = bincode::encode_to_vec(trade, standard())?;
        self.db
            .commit(vec![(COL_TRADES, Self::id_key(trade.id), Some(value))])?;
        Ok(())
    }

    pub fn all_trades(&self) -> StoreResult<Vec<Trade>> {
        let cfg = config::standard();
        let mut iter = self.db.iter(COL_TRADES)?;
        iter.seek_to_first()?;
        let mut out = Vec::new();
        while let Some((_key, raw)) = iter.next()? {
            let (decoded, _): (Trade, usize) = bincode::decode_from_slice(&raw, cfg)?;
            out.push(decoded);
        }
        Ok(out)
    }

    pub fn get_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
        let Some(raw) = self.db.get(COL_ORDERS, &Self::id_key(order_id))? else {
            return Ok(None);
        };
        let (order, _): (Order, usize) = bincode::decode_from_slice(&raw, standard())?;
        Ok(Some(order))
    }

    /// Applies a signed delta to one broker's durable balance, computed from
    /// the trades in a flush batch. A missing broker is a no-op: it can only
    /// happen if the matching `NewBroker` event hasn't flushed yet, which
    /// cannot occur since broker registration always commits before any
    /// trade referencing that broker is enqueued.
    pub fn update_broker_balance(&self, broker_id: BrokerId, delta: i64) -> StoreResult<()> {
        let key = Self::id_key(broker_id);
        let Some(raw) = self.db.get(COL_BROKERS, &key)? else {
            return Ok(());
        };
        let (mut broker, _): (Broker, usize) = bincode::decode_from_slice(&raw, standard())?;
        broker.balance += delta;
        let value = bincode::encode_to_vec(&broker, standard())?;
        self.db.commit(vec![(COL_BROKERS, key, Some(value))])?;
        Ok(())
    }

    /// Linear scan over every trade referencing `order_id`. Used only by
    /// recovery and `lookup`'s durable fallback for pre-restart orders —
    /// never the matching hot path, so an index here would be wasted
    /// complexity.
    pub fn trades_for_order(&self, order_id: OrderId) -> StoreResult<Vec<Trade>> {
        Ok(self
            .all_trades()?
            .into_iter()
            .filter(|t| t.buy_order_id == order_id || t.sell_order_id == order_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::Symbol;
    use crate::order::{OrderStatus, OrderType, Side};
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn sample_order(id: OrderId) -> Order {
        Order {
            id,
            broker_id: 7,
            document_number: "doc".into(),
            side: Side::Bid,
            order_type: OrderType::Limit,
            symbol: "PETR4".parse::<Symbol>().unwrap(),
            price: Some(3500),
            quantity: 100,
            remaining_quantity: 100,
            valid_until: Some(SystemTime::now() + std::time::Duration::from_secs(60)),
            status: OrderStatus::Open,
            created_at: SystemTime::now(),
        }
    }

    #[test]
    fn insert_and_scan_orders() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        store.insert_new_order(&sample_order(1)).unwrap();
        store.insert_new_order(&sample_order(2)).unwrap();

        let all = store.all_orders().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn update_order_mutates_in_place() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.insert_new_order(&sample_order(1)).unwrap();

        store
            .update_order(1, |o| {
                o.status = OrderStatus::Filled;
                o.remaining_quantity = 0;
            })
            .unwrap();

        let order = store.get_order(1).unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.remaining_quantity, 0);
    }

    #[test]
    fn update_missing_order_is_noop() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.update_order(999, |o| o.remaining_quantity = 0).unwrap();
        assert!(store.get_order(999).unwrap().is_none());
    }
}
