use std::str::FromStr;
use std::time::SystemTime;

use criterion::{Criterion, criterion_group, criterion_main};
use matching_engine::engine::Engine;
use matching_engine::instrument::Symbol;
use matching_engine::order::{NewOrderRequest, OrderType, Side};
use matching_engine::persistence::pipeline::Pipeline;

fn symbol() -> Symbol {
    Symbol::from_str("PETR4").unwrap()
}

fn setup_engine(depth: u64, orders_per_level: u64) -> (Engine, u128) {
    let (pipeline, _rx) = Pipeline::new(1_000_000, 256);
    let mut engine = Engine::new(pipeline);
    let (broker, _) = engine.register_broker("bench-broker".to_string(), None);

    for price in 1..=depth {
        for i in 0..orders_per_level {
            engine
                .submit_order(NewOrderRequest {
                    broker_id: broker.id,
                    document_number: format!("ask-{price}-{i}"),
                    side: Side::Ask,
                    order_type: OrderType::Limit,
                    symbol: symbol(),
                    price: Some(price),
                    quantity: 1,
                    valid_until: Some(SystemTime::now() + std::time::Duration::from_secs(3600)),
                })
                .unwrap();
            engine
                .submit_order(NewOrderRequest {
                    broker_id: broker.id,
                    document_number: format!("bid-{price}-{i}"),
                    side: Side::Bid,
                    order_type: OrderType::Limit,
                    symbol: symbol(),
                    price: Some(1),
                    quantity: 1,
                    valid_until: Some(SystemTime::now() + std::time::Duration::from_secs(3600)),
                })
                .unwrap();
        }
    }
    (engine, broker.id)
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("market order crossing half the book", |b| {
        b.iter_batched(
            || setup_engine(depth, orders_per_level),
            |(mut engine, broker_id)| {
                engine
                    .submit_order(NewOrderRequest {
                        broker_id,
                        document_number: "market-buy".to_string(),
                        side: Side::Bid,
                        order_type: OrderType::Market,
                        symbol: symbol(),
                        price: None,
                        quantity: depth * orders_per_level / 2,
                        valid_until: None,
                    })
                    .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("limit order crossing the whole book", |b| {
        b.iter_batched(
            || setup_engine(depth, orders_per_level),
            |(mut engine, broker_id)| {
                engine
                    .submit_order(NewOrderRequest {
                        broker_id,
                        document_number: "limit-sell".to_string(),
                        side: Side::Ask,
                        order_type: OrderType::Limit,
                        symbol: symbol(),
                        price: Some(1),
                        quantity: depth * orders_per_level,
                        valid_until: Some(SystemTime::now() + std::time::Duration::from_secs(3600)),
                    })
                    .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("cancel a resting order", |b| {
        b.iter_batched(
            || {
                let (mut engine, broker_id) = setup_engine(depth, orders_per_level);
                let (order_id, _) = engine
                    .submit_order(NewOrderRequest {
                        broker_id,
                        document_number: "to-cancel".to_string(),
                        side: Side::Bid,
                        order_type: OrderType::Limit,
                        symbol: symbol(),
                        price: Some(1),
                        quantity: 1,
                        valid_until: Some(SystemTime::now() + std::time::Duration::from_secs(3600)),
                    })
                    .unwrap();
                (engine, broker_id, order_id)
            },
            |(mut engine, broker_id, order_id)| {
                engine.cancel_order(broker_id, order_id);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);
