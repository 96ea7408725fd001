//! Noisy order flow generator. Registers a broker, then fires a Poisson
//! stream of small limit orders around a drifting mid-price against a
//! running engine's HTTP surface. Illustrates the engine end to end; not
//! part of the tested core.

use std::time::{Duration, Instant};

use clap::Parser;
use rand::Rng;
use rand_distr::{Distribution, Exp, Exp1, Normal};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    api_base: String,
    #[arg(long, default_value = "PETR4")]
    symbol: String,
    #[arg(long, default_value = "change-me")]
    admin_token: String,
    #[arg(long)]
    run_secs: Option<u64>,
    #[arg(long, default_value_t = 5.0)]
    attack_rate_hz: f64,
    #[arg(long, default_value_t = 0.5)]
    noise_sigma: f64,
    #[arg(long, default_value_t = 20.0)]
    mean_qty: f64,
}

#[derive(Deserialize)]
struct RegisterAck {
    api_key: String,
}

#[derive(Deserialize)]
struct Ack {
    trades: Vec<AckTrade>,
}

#[derive(Deserialize)]
struct AckTrade {
    price: u64,
    quantity: u64,
}

async fn register_broker(client: &Client, api_base: &str, admin_token: &str) -> anyhow::Result<String> {
    let resp = client
        .post(format!("{api_base}/brokers"))
        .header("x-admin-token", admin_token)
        .json(&json!({ "name": "simulate-bot" }))
        .send()
        .await?
        .error_for_status()?;
    let ack: RegisterAck = resp.json().await?;
    Ok(ack.api_key)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = ClientBuilder::new().timeout(Duration::from_secs(5)).build()?;
    let api_key = register_broker(&client, &args.api_base, &args.admin_token).await?;
    info!("registered simulate-bot broker");

    let cancel_token = CancellationToken::new();
    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.cancel();
    });

    let ia = Exp::new(args.attack_rate_hz).expect("attack_rate_hz must be > 0");
    let drift = Normal::new(0.0, args.noise_sigma).expect("noise_sigma >= 0");
    let size = Exp1;

    let mut inventory: i64 = 0;
    let mut pnl: f64 = 0.0;
    let mut mid: f64 = 3400.0;
    let start = Instant::now();
    let spread = 1.0_f64;
    let mut seq: u64 = 0;

    loop {
        if let Some(max_secs) = args.run_secs {
            if start.elapsed().as_secs() >= max_secs {
                break;
            }
        }

        let wait_secs: f64 = ia.sample(&mut rand::rng());
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("received shutdown; exiting simulation loop");
                break;
            }
            _ = tokio::time::sleep(Duration::from_secs_f64(wait_secs)) => {}
        }

        let unit: f64 = size.sample(&mut rand::rng());
        let qty = (unit * args.mean_qty).max(1.0).round() as u64;

        mid += drift.sample(&mut rand::rng());
        let (price, side) = if rand::rng().random_bool(0.5) {
            (mid - spread, "Bid")
        } else {
            (mid + spread, "Ask")
        };
        let price = price.max(1.0).round() as u64;
        seq += 1;

        match client
            .post(format!("{}/orders", args.api_base))
            .header("authorization", format!("Bearer {api_key}"))
            .json(&json!({
                "document_number": format!("sim-{seq}"),
                "side": side,
                "order_type": "Limit",
                "price": price,
                "quantity": qty,
                "symbol": args.symbol,
                "valid_until": chrono_now_plus_hour(),
            }))
            .send()
            .await
        {
            Ok(resp) => match resp.error_for_status() {
                Ok(resp) => match resp.json::<Ack>().await {
                    Ok(ack) => {
                        for t in ack.trades {
                            let px = t.price as f64;
                            let q = t.quantity as f64;
                            if side == "Bid" {
                                inventory -= q as i64;
                                pnl += px * q;
                            } else {
                                inventory += q as i64;
                                pnl -= px * q;
                            }
                        }
                        info!(
                            elapsed = format_args!("{:.1}s", start.elapsed().as_secs_f64()),
                            side,
                            qty,
                            price,
                            mid = format_args!("{:.2}", mid),
                            inventory,
                            pnl = format_args!("{:.2}", pnl),
                            "sim tick"
                        );
                    }
                    Err(e) => warn!(error = %e, "failed to parse order ack"),
                },
                Err(e) => warn!(error = %e, "order post returned non-success"),
            },
            Err(e) => warn!(error = %e, "HTTP request failed"),
        }
    }

    info!(inventory, pnl = format_args!("{:.2}", pnl), "simulation done");
    Ok(())
}

fn chrono_now_plus_hour() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    (SystemTime::now() + Duration::from_secs(3600))
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
