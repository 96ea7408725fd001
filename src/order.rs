use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::instrument::Symbol;

/// Opaque 128-bit order identifier, assigned at admission.
pub type OrderId = u128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
    Expired,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Expired
        )
    }
}

/// A single resting-or-closed order.
///
/// Invariants (enforced by the engine, not by this type):
/// - `remaining_quantity == 0 <=> status == Filled`
/// - a terminal order is never present in any ladder
/// - a market order is never present in a ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub broker_id: u128,
    pub document_number: String,
    pub side: Side,
    pub order_type: OrderType,
    pub symbol: Symbol,
    /// Required iff `order_type == Limit`; absent for market orders.
    pub price: Option<u64>,
    pub quantity: u64,
    pub remaining_quantity: u64,
    /// Required iff `order_type == Limit`.
    pub valid_until: Option<SystemTime>,
    pub status: OrderStatus,
    pub created_at: SystemTime,
}

impl Order {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        match self.valid_until {
            Some(valid_until) => valid_until <= now,
            None => false,
        }
    }

    pub fn rests_in_ladder(&self, now: SystemTime) -> bool {
        self.order_type == OrderType::Limit
            && self.status == OrderStatus::Open
            && self.remaining_quantity > 0
            && !self.is_expired(now)
    }
}

// `SystemTime` has no built-in `bincode::Encode`/`Decode`, so the two time
// fields are hand-rolled via `wire_time` instead of deriving; everything
// else still delegates field-by-field.
impl bincode::Encode for Order {
    fn encode<E: bincode::enc::Encoder>(&self, encoder: &mut E) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.id, encoder)?;
        bincode::Encode::encode(&self.broker_id, encoder)?;
        bincode::Encode::encode(&self.document_number, encoder)?;
        bincode::Encode::encode(&self.side, encoder)?;
        bincode::Encode::encode(&self.order_type, encoder)?;
        bincode::Encode::encode(&self.symbol, encoder)?;
        bincode::Encode::encode(&self.price, encoder)?;
        bincode::Encode::encode(&self.quantity, encoder)?;
        bincode::Encode::encode(&self.remaining_quantity, encoder)?;
        crate::wire_time::encode_opt(&self.valid_until, encoder)?;
        bincode::Encode::encode(&self.status, encoder)?;
        crate::wire_time::encode(&self.created_at, encoder)
    }
}

impl<Context> bincode::Decode<Context> for Order {
    fn decode<D: bincode::de::Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, bincode::error::DecodeError> {
        Ok(Order {
            id: bincode::Decode::decode(decoder)?,
            broker_id: bincode::Decode::decode(decoder)?,
            document_number: bincode::Decode::decode(decoder)?,
            side: bincode::Decode::decode(decoder)?,
            order_type: bincode::Decode::decode(decoder)?,
            symbol: bincode::Decode::decode(decoder)?,
            price: bincode::Decode::decode(decoder)?,
            quantity: bincode::Decode::decode(decoder)?,
            remaining_quantity: bincode::Decode::decode(decoder)?,
            valid_until: crate::wire_time::decode_opt(decoder)?,
            status: bincode::Decode::decode(decoder)?,
            created_at: crate::wire_time::decode(decoder)?,
        })
    }
}

/// Request payload accepted by [`crate::engine::Engine::submit_order`].
///
/// A thin, validated stand-in for whatever the outer HTTP layer decodes;
/// the engine never trusts bytes off the wire directly.
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub broker_id: u128,
    pub document_number: String,
    pub side: Side,
    pub order_type: OrderType,
    pub symbol: Symbol,
    pub price: Option<u64>,
    pub quantity: u64,
    pub valid_until: Option<SystemTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_side_round_trips() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
        assert!(!OrderStatus::Open.is_terminal());
    }
}
