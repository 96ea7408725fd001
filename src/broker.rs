use std::collections::HashMap;
use std::time::SystemTime;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type BrokerId = u128;

/// Fixed-width hex encoding of a SHA-256 digest over a broker's API key.
pub type CredentialHash = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub id: BrokerId,
    pub name: String,
    pub webhook_url: Option<String>,
    /// Signed cumulative balance in cents: Sigma sells - Sigma buys over every
    /// executed trade involving this broker.
    pub balance: i64,
    pub credential_hash: CredentialHash,
    pub created_at: SystemTime,
}

// See `order.rs` for why `created_at` isn't derived like the rest.
impl bincode::Encode for Broker {
    fn encode<E: bincode::enc::Encoder>(&self, encoder: &mut E) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.id, encoder)?;
        bincode::Encode::encode(&self.name, encoder)?;
        bincode::Encode::encode(&self.webhook_url, encoder)?;
        bincode::Encode::encode(&self.balance, encoder)?;
        bincode::Encode::encode(&self.credential_hash, encoder)?;
        crate::wire_time::encode(&self.created_at, encoder)
    }
}

impl<Context> bincode::Decode<Context> for Broker {
    fn decode<D: bincode::de::Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, bincode::error::DecodeError> {
        Ok(Broker {
            id: bincode::Decode::decode(decoder)?,
            name: bincode::Decode::decode(decoder)?,
            webhook_url: bincode::Decode::decode(decoder)?,
            balance: bincode::Decode::decode(decoder)?,
            credential_hash: bincode::Decode::decode(decoder)?,
            created_at: crate::wire_time::decode(decoder)?,
        })
    }
}

fn hash_api_key(api_key: &str) -> CredentialHash {
    let digest = Sha256::digest(api_key.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generates a random, URL-safe API key. Not cryptographically tied to the
/// credential hash's collision resistance — any sufficiently random secret
/// works, since only its hash is ever persisted or compared.
fn generate_api_key() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..40)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Mapping from broker identifier to broker record, plus the reverse
/// mapping from credential hash to broker identifier the outer layer uses
/// to authenticate a bearer API key. Component 4 of the system overview.
#[derive(Debug, Default)]
pub struct BrokerRegistry {
    by_id: HashMap<BrokerId, Broker>,
    by_credential_hash: HashMap<CredentialHash, BrokerId>,
}

impl BrokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new broker, returning the plaintext API key exactly once
    /// (only its hash is ever stored).
    pub fn register(&mut self, name: String, webhook_url: Option<String>) -> (Broker, String) {
        let api_key = generate_api_key();
        let broker = Broker {
            id: uuid::Uuid::new_v4().as_u128(),
            name,
            webhook_url,
            balance: 0,
            credential_hash: hash_api_key(&api_key),
            created_at: SystemTime::now(),
        };
        self.insert(broker.clone());
        (broker, api_key)
    }

    /// Rehydrates a broker loaded from the durable store, without minting a
    /// new API key. Used exclusively by recovery.
    pub fn insert(&mut self, broker: Broker) {
        self.by_credential_hash
            .insert(broker.credential_hash.clone(), broker.id);
        self.by_id.insert(broker.id, broker);
    }

    pub fn get(&self, id: BrokerId) -> Option<&Broker> {
        self.by_id.get(&id)
    }

    pub fn authenticate(&self, api_key: &str) -> Option<BrokerId> {
        self.by_credential_hash
            .get(&hash_api_key(api_key))
            .copied()
    }

    pub fn balance(&self, id: BrokerId) -> Option<i64> {
        self.by_id.get(&id).map(|b| b.balance)
    }

    /// Applies a signed delta to a broker's balance (positive for a seller
    /// receiving proceeds, negative for a buyer paying for a fill).
    pub fn apply_delta(&mut self, id: BrokerId, delta: i64) {
        if let Some(broker) = self.by_id.get_mut(&id) {
            broker.balance += delta;
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &Broker> {
        self.by_id.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_authenticate_round_trips() {
        let mut registry = BrokerRegistry::new();
        let (broker, api_key) = registry.register("Acme Corretora".into(), None);

        let authenticated = registry.authenticate(&api_key);
        assert_eq!(authenticated, Some(broker.id));
    }

    #[test]
    fn wrong_api_key_does_not_authenticate() {
        let mut registry = BrokerRegistry::new();
        registry.register("Acme Corretora".into(), None);

        assert_eq!(registry.authenticate("not-the-key"), None);
    }

    #[test]
    fn balance_deltas_accumulate() {
        let mut registry = BrokerRegistry::new();
        let (broker, _) = registry.register("Acme Corretora".into(), None);

        registry.apply_delta(broker.id, 350_000);
        registry.apply_delta(broker.id, -100_000);

        assert_eq!(registry.balance(broker.id), Some(250_000));
    }
}
