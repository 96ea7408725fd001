//! The outer HTTP surface. Request parsing, auth, and webhook delivery
//! shape are kept outside `Engine` itself; this thin `axum` layer exercises
//! it end to end. The `LoggedJson` extractor, the `ApiErr` helper, and the
//! `TraceLayer`-wrapped router follow the same shape as the rest of this
//! crate's error handling and logging.

use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::warn;

use crate::broker::BrokerId;
use crate::engine::{enforce_ownership, MAX_BOOK_DEPTH};
use crate::errors::{BookError, LookupError, PriceError, SubmitError};
use crate::instrument::Symbol;
use crate::market_data::MAX_PRICE_WINDOW;
use crate::order::{NewOrderRequest, Order, OrderId, OrderType, Side};
use crate::state::AppState;
use crate::trade::Trade;

type ApiErr = (StatusCode, Json<serde_json::Value>);

fn err(status: StatusCode, msg: impl Into<String>) -> ApiErr {
    (status, Json(json!({ "error": msg.into() })))
}

pub struct LoggedJson<T>(pub T);

impl<S, T> FromRequest<S> for LoggedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiErr;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| err(StatusCode::BAD_REQUEST, e.to_string()))?;
        match serde_json::from_slice::<T>(&bytes) {
            Ok(val) => Ok(LoggedJson(val)),
            Err(e) => {
                let preview = String::from_utf8_lossy(&bytes);
                let preview = &preview[..preview.len().min(4096)];
                warn!(error = %e, body_preview = %preview, "request rejected: JSON deserialization failed");
                Err(err(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
            }
        }
    }
}

fn submit_error_status(e: &SubmitError) -> StatusCode {
    match e {
        SubmitError::UnknownBroker => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Pulls the bearer API key out of `Authorization: Bearer <key>` and
/// authenticates it against the broker registry. The outer layer's
/// authentication duty of the outer layer — the core treats every request
/// as already authenticated by the time it reaches `Engine`.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<BrokerId, ApiErr> {
    let raw = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "missing authorization header"))?;
    let api_key = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "expected a bearer token"))?;
    let engine = state.engine.lock().await;
    engine
        .brokers
        .authenticate(api_key)
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "invalid credentials"))
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiErr> {
    let provided = headers.get("x-admin-token").and_then(|v| v.to_str().ok());
    if provided == Some(state.config.admin_token.as_str()) {
        Ok(())
    } else {
        Err(err(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}

fn unix_millis_to_system_time(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}

fn system_time_to_unix_millis(ts: SystemTime) -> u128 {
    ts.duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0)
}

// ---- register_broker ------------------------------------------------------

#[derive(Deserialize)]
pub struct RegisterBrokerPayload {
    pub name: String,
    pub webhook_url: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterBrokerAck {
    pub broker_id: String,
    pub api_key: String,
}

pub async fn register_broker(
    State(state): State<AppState>,
    headers: HeaderMap,
    LoggedJson(payload): LoggedJson<RegisterBrokerPayload>,
) -> Result<Json<RegisterBrokerAck>, ApiErr> {
    require_admin(&state, &headers)?;
    let (broker, api_key) = {
        let mut engine = state.engine.lock().await;
        engine.register_broker(payload.name, payload.webhook_url)
    };
    Ok(Json(RegisterBrokerAck {
        broker_id: broker.id.to_string(),
        api_key,
    }))
}

// ---- submit_order -----------------------------------------------------------

#[derive(Deserialize)]
pub struct NewOrderPayload {
    pub document_number: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(deserialize_with = "parse_symbol")]
    pub symbol: Symbol,
    pub price: Option<u64>,
    pub quantity: u64,
    /// Milliseconds since the Unix epoch; required iff `order_type=limit`.
    pub valid_until: Option<u64>,
}

fn parse_symbol<'de, D>(deserializer: D) -> Result<Symbol, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Symbol::from_str(&s).map_err(serde::de::Error::custom)
}

#[derive(Serialize)]
pub struct TradeView {
    pub id: String,
    pub buy_order_id: String,
    pub sell_order_id: String,
    pub price: u64,
    pub quantity: u64,
    pub executed_at_unix_millis: u128,
}

impl From<&Trade> for TradeView {
    fn from(t: &Trade) -> Self {
        Self {
            id: t.id.to_string(),
            buy_order_id: t.buy_order_id.to_string(),
            sell_order_id: t.sell_order_id.to_string(),
            price: t.price,
            quantity: t.quantity,
            executed_at_unix_millis: system_time_to_unix_millis(t.executed_at),
        }
    }
}

#[derive(Serialize)]
pub struct OrderView {
    pub id: String,
    pub broker_id: String,
    pub document_number: String,
    pub side: Side,
    pub order_type: OrderType,
    pub symbol: String,
    pub price: Option<u64>,
    pub quantity: u64,
    pub remaining_quantity: u64,
    pub status: crate::order::OrderStatus,
}

impl From<&Order> for OrderView {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id.to_string(),
            broker_id: o.broker_id.to_string(),
            document_number: o.document_number.clone(),
            side: o.side,
            order_type: o.order_type,
            symbol: o.symbol.as_str().to_string(),
            price: o.price,
            quantity: o.quantity,
            remaining_quantity: o.remaining_quantity,
            status: o.status,
        }
    }
}

#[derive(Serialize)]
pub struct OrderAck {
    pub order_id: String,
    pub trades: Vec<TradeView>,
}

pub async fn submit_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    LoggedJson(payload): LoggedJson<NewOrderPayload>,
) -> Result<Json<OrderAck>, ApiErr> {
    let broker_id = authenticate(&state, &headers).await?;

    let req = NewOrderRequest {
        broker_id,
        document_number: payload.document_number,
        side: payload.side,
        order_type: payload.order_type,
        symbol: payload.symbol,
        price: payload.price,
        quantity: payload.quantity,
        valid_until: payload.valid_until.map(unix_millis_to_system_time),
    };

    let mut engine = state.engine.lock().await;
    match engine.submit_order(req) {
        Ok((order_id, trades)) => Ok(Json(OrderAck {
            order_id: order_id.to_string(),
            trades: trades.iter().map(TradeView::from).collect(),
        })),
        Err(e) => {
            let status = submit_error_status(&e);
            warn!(error = %e, "order rejected");
            Err(err(status, e.to_string()))
        }
    }
}

// ---- cancel_order ----------------------------------------------------------

pub async fn cancel_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ApiErr> {
    let broker_id = authenticate(&state, &headers).await?;
    let order_id: OrderId = order_id
        .parse()
        .map_err(|_| err(StatusCode::BAD_REQUEST, "malformed order id"))?;

    let mut engine = state.engine.lock().await;
    engine.cancel_order(broker_id, order_id);
    Ok(Json(json!({ "status": "ok" })))
}

// ---- get_order --------------------------------------------------------------

#[derive(Serialize)]
pub struct OrderWithTrades {
    pub order: OrderView,
    pub trades: Vec<TradeView>,
}

pub async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<Json<OrderWithTrades>, ApiErr> {
    let broker_id = authenticate(&state, &headers).await?;
    let order_id: OrderId = order_id
        .parse()
        .map_err(|_| err(StatusCode::BAD_REQUEST, "malformed order id"))?;

    let memory_hit = {
        let mut engine = state.engine.lock().await;
        engine.lookup(order_id)
    };

    // One-shot durable fallback for a pre-restart order not yet
    // rehydrated into memory.
    let (order, trades) = match memory_hit {
        Some(hit) => hit,
        None => {
            let order = state
                .store
                .get_order(order_id)
                .map_err(|e| err(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
                .ok_or_else(|| err(StatusCode::NOT_FOUND, LookupError::NotFound.to_string()))?;
            let trades = state
                .store
                .trades_for_order(order_id)
                .map_err(|e| err(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
            (order, trades)
        }
    };

    enforce_ownership(&order, broker_id)
        .map_err(|_| err(StatusCode::FORBIDDEN, LookupError::Forbidden.to_string()))?;

    Ok(Json(OrderWithTrades {
        order: OrderView::from(&order),
        trades: trades.iter().map(TradeView::from).collect(),
    }))
}

// ---- get_book ---------------------------------------------------------------

#[derive(Deserialize)]
pub struct BookQuery {
    depth: Option<usize>,
}

#[derive(Serialize)]
pub struct BookView {
    pub asks: Vec<(u64, u64, usize)>,
    pub bids: Vec<(u64, u64, usize)>,
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(q): Query<BookQuery>,
) -> Result<Json<BookView>, ApiErr> {
    let symbol = Symbol::from_str(&symbol).map_err(|e| err(StatusCode::BAD_REQUEST, e.to_string()))?;
    let depth = q.depth.unwrap_or(crate::engine::DEFAULT_BOOK_DEPTH).min(MAX_BOOK_DEPTH);

    let engine = state.engine.lock().await;
    let book = engine
        .order_book(&symbol, depth)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, BookError::NotFound.to_string()))?;
    Ok(Json(BookView {
        asks: book.asks,
        bids: book.bids,
    }))
}

// ---- get_price ----------------------------------------------------------------

#[derive(Deserialize)]
pub struct PriceQuery {
    window: Option<usize>,
}

#[derive(Serialize)]
pub struct PriceView {
    pub last_price: u64,
    pub average_price: u64,
    pub trades_in_average: usize,
}

pub async fn get_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(q): Query<PriceQuery>,
) -> Result<Json<PriceView>, ApiErr> {
    let symbol = Symbol::from_str(&symbol).map_err(|e| err(StatusCode::BAD_REQUEST, e.to_string()))?;
    let window = q
        .window
        .unwrap_or(crate::market_data::DEFAULT_PRICE_WINDOW)
        .min(MAX_PRICE_WINDOW);

    let engine = state.engine.lock().await;
    let stats = engine
        .price(&symbol, window)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, PriceError::NotFound.to_string()))?;
    Ok(Json(PriceView {
        last_price: stats.last_price,
        average_price: stats.average_price,
        trades_in_average: stats.trades_in_average,
    }))
}

// ---- get_balance ----------------------------------------------------------------

#[derive(Serialize)]
pub struct BalanceView {
    pub balance: i64,
}

pub async fn get_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BalanceView>, ApiErr> {
    let broker_id = authenticate(&state, &headers).await?;
    let engine = state.engine.lock().await;
    let balance = engine.balance(broker_id).unwrap_or(0);
    Ok(Json(BalanceView { balance }))
}

/// Constructs the application's `Router` with all routes and shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/brokers", post(register_broker))
        .route("/orders", post(submit_order))
        .route("/orders/{id}", delete(cancel_order).get(get_order))
        .route("/book/{symbol}", get(get_book))
        .route("/price/{symbol}", get(get_price))
        .route("/balance", get(get_balance))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false).level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        .with_state(state)
}
