use thiserror::Error;

/// Validation failures at order admission. The only error kind the writer
/// surfaces to callers — everything else (transient durability failures,
/// webhook failures, ownership-mismatch cancels) is absorbed and logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
    #[error("limit orders require a positive price")]
    MissingOrInvalidPrice,
    #[error("market orders must not specify a price")]
    UnexpectedPrice,
    #[error("limit orders require an expiry strictly in the future")]
    MissingOrPastExpiry,
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),
    #[error("unknown broker id")]
    UnknownBroker,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("order not found")]
    NotFound,
    #[error("order belongs to a different broker")]
    Forbidden,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("symbol has never traded or rested an order")]
    NotFound,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("no trades recorded for this symbol")]
    NotFound,
}
