use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use matching_engine::{
    api::router,
    config::EngineConfig,
    engine::Engine,
    persistence::{pipeline::Pipeline, store::Store},
    state::AppState,
};
use serde_json::{Value, json};
use tempfile::tempdir;
use tokio::sync::Mutex;
use tower::ServiceExt;

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let (pipeline, _rx) = Pipeline::new(1024, 256);
    let engine = Engine::new(pipeline);
    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        store,
        config: Arc::new(EngineConfig::default()),
    };
    (router(state), dir)
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_broker(app: &Router, name: &str) -> (String, String) {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/brokers")
                .header("content-type", "application/json")
                .header("x-admin-token", "change-me")
                .body(Body::from(json!({ "name": name }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = body_json(res).await;
    (
        v["broker_id"].as_str().unwrap().to_string(),
        v["api_key"].as_str().unwrap().to_string(),
    )
}

fn submit_request(api_key: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {api_key}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_broker_requires_admin_token() {
    let (app, _tmp) = test_app().await;
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/brokers")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": "acme" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_order_requires_authentication() {
    let (app, _tmp) = test_app().await;
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "document_number": "DOC1",
                        "side": "Bid",
                        "order_type": "Limit",
                        "symbol": "PETR4",
                        "price": 3400,
                        "quantity": 10,
                        "valid_until": 9_999_999_999_999u64
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn s1_basic_match_end_to_end() {
    let (app, _tmp) = test_app().await;
    let (_, seller_key) = register_broker(&app, "seller").await;
    let (_, buyer_key) = register_broker(&app, "buyer").await;

    let ask = app
        .clone()
        .oneshot(submit_request(
            &seller_key,
            json!({
                "document_number": "DOC1",
                "side": "Ask",
                "order_type": "Limit",
                "symbol": "PETR4",
                "price": 3500,
                "quantity": 100,
                "valid_until": 9_999_999_999_999u64
            }),
        ))
        .await
        .unwrap();
    assert_eq!(ask.status(), StatusCode::OK);

    let bid = app
        .clone()
        .oneshot(submit_request(
            &buyer_key,
            json!({
                "document_number": "DOC2",
                "side": "Bid",
                "order_type": "Limit",
                "symbol": "PETR4",
                "price": 3510,
                "quantity": 100,
                "valid_until": 9_999_999_999_999u64
            }),
        ))
        .await
        .unwrap();
    assert_eq!(bid.status(), StatusCode::OK);
    let v = body_json(bid).await;
    assert_eq!(v["trades"].as_array().unwrap().len(), 1);
    assert_eq!(v["trades"][0]["price"].as_u64().unwrap(), 3500);
}

#[tokio::test]
async fn book_not_found_for_untouched_symbol() {
    let (app, _tmp) = test_app().await;
    let res = app
        .oneshot(
            Request::builder()
                .uri("/book/VALE3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn price_not_found_without_trades() {
    let (app, _tmp) = test_app().await;
    let res = app
        .oneshot(
            Request::builder()
                .uri("/price/ABEV3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_is_idempotent_over_http() {
    let (app, _tmp) = test_app().await;
    let (_, key) = register_broker(&app, "owner").await;

    let submit = app
        .clone()
        .oneshot(submit_request(
            &key,
            json!({
                "document_number": "DOC1",
                "side": "Bid",
                "order_type": "Limit",
                "symbol": "PETR4",
                "price": 3400,
                "quantity": 10,
                "valid_until": 9_999_999_999_999u64
            }),
        ))
        .await
        .unwrap();
    let v = body_json(submit).await;
    let order_id = v["order_id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/orders/{order_id}"))
                    .header("authorization", format!("Bearer {key}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let get = app
        .oneshot(
            Request::builder()
                .uri(format!("/orders/{order_id}"))
                .header("authorization", format!("Bearer {key}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::OK);
    let v = body_json(get).await;
    assert_eq!(v["order"]["status"], json!("Cancelled"));
}

#[tokio::test]
async fn get_order_forbidden_for_non_owner() {
    let (app, _tmp) = test_app().await;
    let (_, owner_key) = register_broker(&app, "owner").await;
    let (_, other_key) = register_broker(&app, "stranger").await;

    let submit = app
        .clone()
        .oneshot(submit_request(
            &owner_key,
            json!({
                "document_number": "DOC1",
                "side": "Bid",
                "order_type": "Limit",
                "symbol": "PETR4",
                "price": 3400,
                "quantity": 10,
                "valid_until": 9_999_999_999_999u64
            }),
        ))
        .await
        .unwrap();
    let v = body_json(submit).await;
    let order_id = v["order_id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(
            Request::builder()
                .uri(format!("/orders/{order_id}"))
                .header("authorization", format!("Bearer {other_key}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
