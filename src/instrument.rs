use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a [`Symbol`], per the data model (`symbol: string, <=10 chars`).
pub const MAX_SYMBOL_LEN: usize = 10;

/// A ticker in the engine's fixed equities universe.
///
/// The constructor enforces the length bound from the data model; the
/// *membership* bound (only symbols in [`Symbol::universe`] are tradable)
/// is enforced separately by callers that need it (`submit_order`), since
/// queries are allowed to ask about a symbol that has never traded (and
/// get a not-found answer) without that being a validation error.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Symbol(String);

#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    #[error("symbol must be 1-{MAX_SYMBOL_LEN} characters, got {0}")]
    BadLength(usize),
}

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fixed universe of tradable equities: a handful of large, liquid
    /// tickers, enough to exercise multi-symbol behavior in tests and demos.
    pub fn universe() -> &'static [&'static str] {
        &["PETR4", "VALE3", "ITUB4", "BBDC4", "ABEV3", "MGLU3"]
    }

    pub fn is_tradable(&self) -> bool {
        Self::universe().contains(&self.0.as_str())
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_SYMBOL_LEN {
            return Err(SymbolError::BadLength(s.len()));
        }
        Ok(Symbol(s.to_ascii_uppercase()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlong_symbol() {
        assert!(matches!(
            "ABCDEFGHIJK".parse::<Symbol>(),
            Err(SymbolError::BadLength(11))
        ));
    }

    #[test]
    fn rejects_empty_symbol() {
        assert!("".parse::<Symbol>().is_err());
    }

    #[test]
    fn universe_members_are_tradable() {
        for s in Symbol::universe() {
            let sym: Symbol = s.parse().unwrap();
            assert!(sym.is_tradable());
        }
    }

    #[test]
    fn unknown_symbol_is_not_tradable() {
        let sym: Symbol = "ZZZZ".parse().unwrap();
        assert!(!sym.is_tradable());
    }
}
