use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::instrument::Symbol;
use crate::order::OrderId;

pub type TradeId = u128;

/// A single executed match between a buy and a sell order.
///
/// `price` is always the **resting (passive) order's** price, never the
/// aggressor's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: u64,
    pub quantity: u64,
    pub executed_at: SystemTime,
}

// See `order.rs` for why `executed_at` isn't derived like the rest.
impl bincode::Encode for Trade {
    fn encode<E: bincode::enc::Encoder>(&self, encoder: &mut E) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.id, encoder)?;
        bincode::Encode::encode(&self.symbol, encoder)?;
        bincode::Encode::encode(&self.buy_order_id, encoder)?;
        bincode::Encode::encode(&self.sell_order_id, encoder)?;
        bincode::Encode::encode(&self.price, encoder)?;
        bincode::Encode::encode(&self.quantity, encoder)?;
        crate::wire_time::encode(&self.executed_at, encoder)
    }
}

impl<Context> bincode::Decode<Context> for Trade {
    fn decode<D: bincode::de::Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, bincode::error::DecodeError> {
        Ok(Trade {
            id: bincode::Decode::decode(decoder)?,
            symbol: bincode::Decode::decode(decoder)?,
            buy_order_id: bincode::Decode::decode(decoder)?,
            sell_order_id: bincode::Decode::decode(decoder)?,
            price: bincode::Decode::decode(decoder)?,
            quantity: bincode::Decode::decode(decoder)?,
            executed_at: crate::wire_time::decode(decoder)?,
        })
    }
}
