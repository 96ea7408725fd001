//! `bincode` has no built-in `Encode`/`Decode` for `std::time::SystemTime`
//! (its representation isn't guaranteed portable). The durable store needs
//! to persist timestamps anyway, so `Order`, `Trade`, and `Broker` encode
//! theirs manually via these helpers, converting to/from nanoseconds since
//! the Unix epoch — the same `to_nanos` technique the teacher's `store.rs`
//! already uses to build lexicographically-ordered keys.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bincode::de::Decoder;
use bincode::enc::Encoder;
use bincode::error::{DecodeError, EncodeError};
use bincode::Encode;

pub(crate) fn encode(ts: &SystemTime, encoder: &mut impl Encoder) -> Result<(), EncodeError> {
    let nanos = ts.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_nanos() as u64;
    bincode::Encode::encode(&nanos, encoder)
}

pub(crate) fn decode(decoder: &mut impl Decoder) -> Result<SystemTime, DecodeError> {
    let nanos: u64 = bincode::Decode::decode(decoder)?;
    Ok(UNIX_EPOCH + Duration::from_nanos(nanos))
}

pub(crate) fn encode_opt(ts: &Option<SystemTime>, encoder: &mut impl Encoder) -> Result<(), EncodeError> {
    match ts {
        Some(t) => {
            true.encode(encoder)?;
            encode(t, encoder)
        }
        None => false.encode(encoder),
    }
}

pub(crate) fn decode_opt(decoder: &mut impl Decoder) -> Result<Option<SystemTime>, DecodeError> {
    let present: bool = bincode::Decode::decode(decoder)?;
    if present { Ok(Some(decode(decoder)?)) } else { Ok(None) }
}
