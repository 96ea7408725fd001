//! Component 7 of the system overview: a bounded queue of immutable event
//! snapshots plus a periodic batch flusher that makes memory mutations
//! durable. See `events` for the event shapes, `store` for the physical
//! encoding, and `pipeline` for the queue + flusher plumbing.

pub mod events;
pub mod pipeline;
pub mod store;
